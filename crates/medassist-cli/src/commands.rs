use std::str::FromStr;

pub const HELP: &str = "\
Commands:
  login [email] [password]   sign in (prompts for missing fields)
  register                   create an account
  logout                     sign out
  whoami                     show the signed-in user
  tab <name>                 switch dashboard tab
  refresh                    re-fetch the dashboard lists
  doctors                    list doctors (patients)
  start <doctor>             open a chat with a doctor, by number or id
  chats                      list your chats
  open <chat>                open a chat, by number or id
  say <message>              send a message to the open chat
  rx                         write a prescription for the open chat (doctors)
  dispense <prescription>    dispense a pending prescription (pharmacy)
  help                       show this list
  quit                       exit";

/// One line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Login {
        email: Option<String>,
        password: Option<String>,
    },
    Register,
    Logout,
    WhoAmI,
    Tab(String),
    Refresh,
    Doctors,
    Start(String),
    Chats,
    Open(String),
    Say(String),
    Rx,
    Dispense(String),
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let arg = |usage: &str| {
            if rest.is_empty() {
                Err(format!("usage: {}", usage))
            } else {
                Ok(rest.to_string())
            }
        };

        match word.to_ascii_lowercase().as_str() {
            "help" | "?" => Ok(Self::Help),
            "login" => {
                let mut parts = rest.split_whitespace();
                Ok(Self::Login {
                    email: parts.next().map(str::to_string),
                    password: parts.next().map(str::to_string),
                })
            }
            "register" => Ok(Self::Register),
            "logout" => Ok(Self::Logout),
            "whoami" => Ok(Self::WhoAmI),
            "tab" => arg("tab <name>").map(Self::Tab),
            "refresh" => Ok(Self::Refresh),
            "doctors" => Ok(Self::Doctors),
            "start" => arg("start <doctor>").map(Self::Start),
            "chats" => Ok(Self::Chats),
            "open" => arg("open <chat>").map(Self::Open),
            "say" => arg("say <message>").map(Self::Say),
            "rx" => Ok(Self::Rx),
            "dispense" => arg("dispense <prescription>").map(Self::Dispense),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command '{}', try 'help'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_with_and_without_credentials() {
        assert_eq!(
            "login pat@example.com secret".parse::<Command>().unwrap(),
            Command::Login {
                email: Some("pat@example.com".into()),
                password: Some("secret".into()),
            }
        );
        assert_eq!(
            "login".parse::<Command>().unwrap(),
            Command::Login {
                email: None,
                password: None,
            }
        );
    }

    #[test]
    fn say_keeps_inner_spacing() {
        assert_eq!(
            "say  hello   there ".parse::<Command>().unwrap(),
            Command::Say("hello   there".into())
        );
    }

    #[test]
    fn missing_argument_shows_usage() {
        assert_eq!("open".parse::<Command>().unwrap_err(), "usage: open <chat>");
        assert_eq!("dispense  ".parse::<Command>().unwrap_err(), "usage: dispense <prescription>");
    }

    #[test]
    fn case_insensitive_and_unknown() {
        assert_eq!("QUIT".parse::<Command>().unwrap(), Command::Quit);
        assert_eq!("Tab doctors".parse::<Command>().unwrap(), Command::Tab("doctors".into()));
        assert!("dance".parse::<Command>().unwrap_err().contains("unknown command"));
    }
}
