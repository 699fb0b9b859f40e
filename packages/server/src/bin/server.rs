//! Planning poker room server.
//!
//! Participants connect over WebSocket, join a room by name, and estimate together.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin mitsumori-server
//! cargo run --bin mitsumori-server -- --host 0.0.0.0 --port 3000 --deck linear --reveal-delay-ms 3000
//! cargo run --bin mitsumori-server -- --deck-values 1,2,4,8,16
//! ```

use std::time::Duration;

use clap::{Parser, ValueEnum};
use mitsumori_server::{
    config::ServerConfig,
    domain::{Deck, RoomPolicy, ValueObjectError},
    ui::Server,
};
use mitsumori_shared::logger::setup_logger;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DeckKind {
    /// 1, 2, 3, 5, 10
    Linear,
    /// 1, 2, 3, 5, 8, 13, 21, 34, 55, 89
    Fibonacci,
}

impl From<DeckKind> for Deck {
    fn from(kind: DeckKind) -> Self {
        match kind {
            DeckKind::Linear => Deck::linear(),
            DeckKind::Fibonacci => Deck::fibonacci(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "mitsumori-server")]
#[command(about = "Planning poker room server with real-time broadcast", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Allowed estimate values
    #[arg(long, value_enum, default_value_t = DeckKind::Fibonacci)]
    deck: DeckKind,

    /// Custom estimate values, comma separated (overrides --deck)
    #[arg(long, value_delimiter = ',', conflicts_with = "deck")]
    deck_values: Option<Vec<u32>>,

    /// Participants required before voting can start
    #[arg(long, default_value = "1")]
    min_participants: usize,

    /// Countdown before results are revealed (0 reveals immediately)
    #[arg(long, default_value = "0")]
    reveal_delay_ms: u64,

    /// Report rejected actions back to the sender
    #[arg(long)]
    strict: bool,

    /// Seconds an empty room is kept before eviction
    #[arg(long, default_value = "300")]
    room_idle_secs: u64,
}

impl TryFrom<Args> for ServerConfig {
    type Error = ValueObjectError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let deck = match args.deck_values {
            Some(values) => Deck::new(values)?,
            None => args.deck.into(),
        };

        Ok(Self {
            host: args.host,
            port: args.port,
            policy: RoomPolicy {
                deck,
                min_participants_to_start: args.min_participants,
                reveal_delay: Duration::from_millis(args.reveal_delay_ms),
            },
            strict_mode: args.strict,
            room_idle: Duration::from_secs(args.room_idle_secs),
        })
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = match ServerConfig::try_from(Args::parse()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };
    tracing::debug!("Starting with {:?}", config);

    let server = Server::from_config(&config);
    if let Err(e) = server.run(&config.bind_addr()).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(args: &[&str]) -> Result<ServerConfig, ValueObjectError> {
        let argv = std::iter::once("mitsumori-server").chain(args.iter().copied());
        let args = Args::try_parse_from(argv).unwrap();
        ServerConfig::try_from(args)
    }

    #[test]
    fn test_preset_deck_is_selected() {
        // テスト項目: --deck でプリセットのデッキが選ばれる
        // when (操作):
        let config = config_from(&["--deck", "linear"]).unwrap();

        // then (期待する結果):
        assert_eq!(config.policy.deck, Deck::linear());
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_custom_deck_values_are_normalized() {
        // テスト項目: --deck-values で任意のデッキを指定でき、昇順・重複なしになる
        // when (操作):
        let config =
            config_from(&["--deck-values", "8,1,3,1", "--reveal-delay-ms", "3000"]).unwrap();

        // then (期待する結果):
        assert_eq!(config.policy.deck.values(), &[1, 3, 8]);
        assert_eq!(config.policy.reveal_delay, Duration::from_secs(3));
    }

    #[test]
    fn test_non_numeric_deck_value_is_rejected() {
        // テスト項目: 数値でないデッキの値は引数エラーになる
        // when (操作):
        let result = Args::try_parse_from(["mitsumori-server", "--deck-values", "1,two"]);

        // then (期待する結果):
        assert!(result.is_err());
    }
}
