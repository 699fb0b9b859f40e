//! Domain logic for client-side operations.
//!
//! Input parsing is kept free of I/O so it can be tested directly.

use mitsumori_server::infrastructure::dto::websocket::ClientMessage;

use crate::error::ClientError;

/// Help text listing the available commands
pub const HELP: &str = "\
Commands:
  /start        start a voting round
  /vote <n>     vote for <n> (a bare number also works)
  /next         reset the room for the next round
  /help         show this help
  /quit         leave the room";

/// What a line of input asks the client to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// Send a message to the server
    Send(ClientMessage),
    Help,
    Quit,
}

/// Parse one line of user input.
///
/// # Returns
///
/// * `Ok(None)` - the line was blank
/// * `Ok(Some(command))` - a recognised command
/// * `Err(ClientError::InvalidCommand)` - anything else, with a hint for the user
pub fn parse_input(line: &str) -> Result<Option<ClientCommand>, ClientError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mut parts = line.split_whitespace();
    let head = parts.next().unwrap_or_default();
    let arg = parts.next();
    if parts.next().is_some() {
        return Err(ClientError::InvalidCommand(format!(
            "Too many arguments: '{}'",
            line
        )));
    }

    let command = match (head, arg) {
        ("/start", None) => ClientCommand::Send(ClientMessage::StartVoting),
        ("/next", None) => ClientCommand::Send(ClientMessage::NextRound),
        ("/help", None) => ClientCommand::Help,
        ("/quit", None) | ("/exit", None) => ClientCommand::Quit,
        ("/vote", Some(value)) => ClientCommand::Send(parse_vote(value)?),
        ("/vote", None) => {
            return Err(ClientError::InvalidCommand(
                "Usage: /vote <n>".to_string(),
            ));
        }
        (value, None) if !value.starts_with('/') => ClientCommand::Send(parse_vote(value)?),
        _ => {
            return Err(ClientError::InvalidCommand(format!(
                "Unknown command '{}'. Type /help for the list of commands",
                head
            )));
        }
    };

    Ok(Some(command))
}

fn parse_vote(value: &str) -> Result<ClientMessage, ClientError> {
    value
        .parse::<u32>()
        .map(|value| ClientMessage::SubmitVote { value })
        .map_err(|_| ClientError::InvalidCommand(format!("'{}' is not a number", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_start_and_next() {
        // テスト項目: /start と /next がそれぞれのメッセージになる
        // given (前提条件):
        let inputs = ["/start", "  /next  "];

        // when (操作):
        let commands: Vec<_> = inputs.iter().map(|i| parse_input(i).unwrap()).collect();

        // then (期待する結果):
        assert_eq!(
            commands,
            vec![
                Some(ClientCommand::Send(ClientMessage::StartVoting)),
                Some(ClientCommand::Send(ClientMessage::NextRound)),
            ]
        );
    }

    #[test]
    fn test_parse_vote_command_and_bare_number() {
        // テスト項目: /vote <n> と数字だけの入力が同じ投票になる
        // given (前提条件):
        let expected = Some(ClientCommand::Send(ClientMessage::SubmitVote { value: 8 }));

        // when (操作):
        let with_command = parse_input("/vote 8").unwrap();
        let bare = parse_input("8").unwrap();

        // then (期待する結果):
        assert_eq!(with_command, expected);
        assert_eq!(bare, expected);
    }

    #[test]
    fn test_parse_non_numeric_vote_is_error() {
        // テスト項目: 数値でない投票はエラーになり送信されない
        // given (前提条件):
        let inputs = ["/vote five", "-3", "1.5"];

        // when (操作) / then (期待する結果):
        for input in inputs {
            assert!(
                matches!(parse_input(input), Err(ClientError::InvalidCommand(_))),
                "'{}' should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_parse_vote_without_value() {
        // テスト項目: 値のない /vote は使い方を返す
        // when (操作):
        let result = parse_input("/vote");

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ClientError::InvalidCommand("Usage: /vote <n>".to_string()))
        );
    }

    #[test]
    fn test_parse_quit_help_and_blank() {
        // テスト項目: /quit, /exit, /help と空行
        assert_eq!(parse_input("/quit").unwrap(), Some(ClientCommand::Quit));
        assert_eq!(parse_input("/exit").unwrap(), Some(ClientCommand::Quit));
        assert_eq!(parse_input("/help").unwrap(), Some(ClientCommand::Help));
        assert_eq!(parse_input("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_unknown_command() {
        // テスト項目: 未知のコマンドと余分な引数はエラー
        assert!(matches!(
            parse_input("/dance"),
            Err(ClientError::InvalidCommand(msg)) if msg.contains("/dance")
        ));
        assert!(parse_input("/vote 3 5").is_err());
        assert!(parse_input("/start now").is_err());
    }
}
