//! UseCase: コマンド適用とブロードキャスト
//!
//! 参加者の操作（join / start-voting / submit-vote / next-round / leave）を
//! RoomSession に適用し、結果のイベントをルームの参加者全員に配信する。
//!
//! ## 直列化
//!
//! `apply` と配信は 1 つのロックの中で行う。後から適用された状態が先に届くことはなく、
//! 参加者は常に適用順にイベントを受け取る。
//!
//! ## 遅延公開
//!
//! `CountdownStarted` を受け取ったら、指定時間後に `Reveal` を適用するタスクを起動する。
//! タスクはキャンセルされず、ルームが空でも必ず発火する。

use std::{sync::Arc, time::Duration};

use mitsumori_shared::time::Clock;
use tokio::sync::Mutex;
use tracing::Level;

use crate::domain::{
    ErrorCategory, MessagePusher, RoomCommand, RoomEvent, RoomId, RoomRepository, SessionError,
    Timestamp,
};

use super::error::DispatchError;

/// コマンド適用のユースケース
#[derive(Clone)]
pub struct DispatchCommandUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 現在時刻
    clock: Arc<dyn Clock>,
    /// 拒否した操作を送信者に通知するか
    strict_mode: bool,
    /// apply と配信を直列化するためのロック
    serial: Arc<Mutex<()>>,
}

impl DispatchCommandUseCase {
    /// 新しい DispatchCommandUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        strict_mode: bool,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
            strict_mode,
            serial: Arc::new(Mutex::new(())),
        }
    }

    /// コマンドを適用し、イベントをルームの参加者に配信する
    ///
    /// # Arguments
    ///
    /// * `room_id` - 対象のルーム
    /// * `command` - 適用するコマンド
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<RoomEvent>)` - 配信したイベント（配信順）
    /// * `Err(DispatchError)` - 前提条件を満たさず、状態は変更されていない
    pub async fn execute(
        &self,
        room_id: &RoomId,
        command: RoomCommand,
    ) -> Result<Vec<RoomEvent>, DispatchError> {
        let command_name = command.name();
        let is_leave = matches!(command, RoomCommand::Leave { .. });
        // 切断済みの接続には通知しない
        let reply_to = if is_leave {
            None
        } else {
            command.sender().copied()
        };

        let _guard = self.serial.lock().await;
        let now = Timestamp::new(self.clock.now_millis());

        let transition = match self.repository.apply(room_id, command, now).await {
            Ok(transition) => transition,
            Err(error) => {
                log_rejection(room_id, command_name, is_leave, &error);
                if self.strict_mode
                    && let Some(sender) = reply_to
                {
                    let rejection = RoomEvent::Rejected {
                        reason: error.to_string(),
                    };
                    if let Err(e) = self.message_pusher.push_to(&sender, &rejection).await {
                        tracing::warn!("Failed to notify rejection to '{}': {}", sender, e);
                    }
                }
                return Err(error.into());
            }
        };

        tracing::debug!(
            "Applied '{}' to room '{}' ({} event(s), {} recipient(s))",
            command_name,
            room_id,
            transition.events.len(),
            transition.recipients.len()
        );

        for event in &transition.events {
            if let Err(e) = self
                .message_pusher
                .broadcast(&transition.recipients, event)
                .await
            {
                tracing::warn!("Failed to broadcast to room '{}': {}", room_id, e);
            }

            if let RoomEvent::CountdownStarted { round, delay } = event {
                self.schedule_reveal(room_id.clone(), *round, *delay);
            }
        }

        Ok(transition.events)
    }

    /// `delay` 後に結果を公開する
    fn schedule_reveal(&self, room_id: RoomId, round: u64, delay: Duration) {
        tracing::info!(
            "Revealing round {} of room '{}' in {:?}",
            round,
            room_id,
            delay
        );

        let dispatcher = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = dispatcher
                .execute(&room_id, RoomCommand::Reveal { round })
                .await
            {
                tracing::debug!("Reveal of round {} in '{}' skipped: {}", round, room_id, e);
            }
        });
    }
}

/// 拒否したコマンドのログレベル
///
/// join せずに閉じた接続の leave はよくあることなので debug に留める。
fn rejection_level(is_leave: bool, error: &SessionError) -> Level {
    match error {
        SessionError::RoomNotFound | SessionError::NotAParticipant if is_leave => Level::DEBUG,
        _ => match error.category() {
            ErrorCategory::InvalidInput | ErrorCategory::Internal => Level::WARN,
            ErrorCategory::InvalidForPhase => Level::INFO,
        },
    }
}

fn log_rejection(room_id: &RoomId, command_name: &str, is_leave: bool, error: &SessionError) {
    let level = rejection_level(is_leave, error);
    if level == Level::DEBUG {
        tracing::debug!(
            "Ignored '{}' from a connection outside room '{}': {}",
            command_name,
            room_id,
            error
        );
    } else if level == Level::INFO {
        tracing::info!(
            "Ignored '{}' in room '{}': {}",
            command_name,
            room_id,
            error
        );
    } else if error.category() == ErrorCategory::Internal {
        tracing::warn!(
            "Aborted '{}' in room '{}': {}",
            command_name,
            room_id,
            error
        );
    } else {
        tracing::warn!(
            "Rejected '{}' in room '{}': {}",
            command_name,
            room_id,
            error
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            Deck, MockMessagePusher, ParticipantId, ParticipantIdFactory, Phase, PusherChannel,
            RoomPolicy,
        },
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository,
        },
    };
    use mitsumori_shared::time::FixedClock;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - コマンド適用後、ルームの参加者全員に同じイベントが同じ順序で届くこと
    // - 拒否された操作では何も配信されないこと（strict モードでは送信者にだけ通知）
    // - カウントダウン後に結果が公開されること
    // ========================================

    struct Harness {
        usecase: DispatchCommandUseCase,
        pusher: Arc<WebSocketMessagePusher>,
        room_id: RoomId,
    }

    impl Harness {
        fn new(policy: RoomPolicy, strict_mode: bool) -> Self {
            let repository = Arc::new(InMemoryRoomRepository::new(policy));
            let pusher = Arc::new(WebSocketMessagePusher::new());
            let usecase = DispatchCommandUseCase::new(
                repository,
                pusher.clone(),
                Arc::new(FixedClock::new(1_000)),
                strict_mode,
            );
            Self {
                usecase,
                pusher,
                room_id: RoomId::new("default".to_string()).unwrap(),
            }
        }

        async fn connect(&self) -> (ParticipantId, mpsc::UnboundedReceiver<String>) {
            let (tx, rx): (PusherChannel, _) = mpsc::unbounded_channel();
            let participant_id = ParticipantIdFactory::generate();
            self.pusher.register_client(participant_id, tx).await;
            (participant_id, rx)
        }

        async fn join(&self, name: &str) -> (ParticipantId, mpsc::UnboundedReceiver<String>) {
            let (participant_id, mut rx) = self.connect().await;
            self.usecase
                .execute(
                    &self.room_id,
                    RoomCommand::Join {
                        participant_id,
                        name: name.to_string(),
                    },
                )
                .await
                .unwrap();
            drain(&mut rx);
            (participant_id, rx)
        }

        async fn run(&self, command: RoomCommand) -> Result<Vec<RoomEvent>, DispatchError> {
            self.usecase.execute(&self.room_id, command).await
        }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<serde_json::Value> {
        let mut frames = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            frames.push(serde_json::from_str(&frame).unwrap());
        }
        frames
    }

    fn types(frames: &[serde_json::Value]) -> Vec<&str> {
        frames
            .iter()
            .map(|f| f["type"].as_str().unwrap_or_default())
            .collect()
    }

    #[tokio::test]
    async fn test_join_broadcasts_state_to_everyone_including_joiner() {
        // テスト項目: 参加すると本人を含む全員に最新の状態が届く
        // given (前提条件):
        let harness = Harness::new(RoomPolicy::default(), false);
        let (_alice, mut alice_rx) = harness.join("Alice").await;
        let (bob, mut bob_rx) = harness.connect().await;

        // when (操作):
        harness
            .run(RoomCommand::Join {
                participant_id: bob,
                name: "Bob".to_string(),
            })
            .await
            .unwrap();

        // then (期待する結果):
        for frames in [drain(&mut alice_rx), drain(&mut bob_rx)] {
            assert_eq!(types(&frames), vec!["room-state"]);
            let names: Vec<&str> = frames[0]["participants"]
                .as_array()
                .unwrap()
                .iter()
                .map(|p| p["name"].as_str().unwrap())
                .collect();
            assert_eq!(names, vec!["Alice", "Bob"]);
        }
    }

    #[tokio::test]
    async fn test_connection_outside_room_receives_nothing() {
        // テスト項目: 参加していない接続・別ルームの参加者にはイベントが届かない
        // given (前提条件):
        let harness = Harness::new(RoomPolicy::default(), false);
        let (alice, mut alice_rx) = harness.join("Alice").await;
        let (_lurker, mut lurker_rx) = harness.connect().await;
        let (other, mut other_rx) = harness.connect().await;
        harness
            .usecase
            .execute(
                &RoomId::new("other".to_string()).unwrap(),
                RoomCommand::Join {
                    participant_id: other,
                    name: "Olivia".to_string(),
                },
            )
            .await
            .unwrap();
        drain(&mut other_rx);

        // when (操作):
        harness
            .run(RoomCommand::StartVoting {
                participant_id: alice,
            })
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(
            types(&drain(&mut alice_rx)),
            vec!["voting-started", "room-state"]
        );
        assert!(drain(&mut lurker_rx).is_empty());
        assert!(drain(&mut other_rx).is_empty());
    }

    #[tokio::test]
    async fn test_voting_round_event_sequence() {
        // テスト項目: 投票の進捗と結果が全員に同じ順序で届く
        // given (前提条件):
        let harness = Harness::new(RoomPolicy::default(), false);
        let (a, mut a_rx) = harness.join("A").await;
        let (b, mut b_rx) = harness.join("B").await;
        drain(&mut a_rx);
        harness
            .run(RoomCommand::StartVoting { participant_id: a })
            .await
            .unwrap();
        drain(&mut a_rx);
        drain(&mut b_rx);

        // when (操作):
        harness
            .run(RoomCommand::SubmitVote {
                participant_id: a,
                value: 5,
            })
            .await
            .unwrap();
        harness
            .run(RoomCommand::SubmitVote {
                participant_id: b,
                value: 8,
            })
            .await
            .unwrap();

        // then (期待する結果):
        let a_frames = drain(&mut a_rx);
        let b_frames = drain(&mut b_rx);
        assert_eq!(a_frames, b_frames);
        assert_eq!(
            types(&a_frames),
            vec!["vote-count", "vote-count", "voting-complete", "room-state"]
        );
        assert_eq!(a_frames[0]["votedCount"], 1);
        assert_eq!(a_frames[0]["totalPlayers"], 2);
        assert_eq!(a_frames[1]["votedCount"], 2);
        assert_eq!(a_frames[2]["average"], 6.5);
        assert_eq!(a_frames[3]["phase"], "results");
    }

    #[tokio::test]
    async fn test_rejected_vote_is_silently_dropped() {
        // テスト項目: デッキ外の投票は何も配信されず、エラーとして返るだけ
        // given (前提条件):
        let harness = Harness::new(
            RoomPolicy {
                deck: Deck::linear(),
                ..RoomPolicy::default()
            },
            false,
        );
        let (a, mut a_rx) = harness.join("A").await;
        harness
            .run(RoomCommand::StartVoting { participant_id: a })
            .await
            .unwrap();
        drain(&mut a_rx);

        // when (操作):
        let result = harness
            .run(RoomCommand::SubmitVote {
                participant_id: a,
                value: 8,
            })
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(DispatchError::Rejected(SessionError::ValueNotInDeck(8)))
        );
        assert!(drain(&mut a_rx).is_empty());
    }

    #[tokio::test]
    async fn test_strict_mode_notifies_only_sender() {
        // テスト項目: strict モードでは拒否理由が送信者にだけ通知され、ブロードキャストはされない
        // given (前提条件):
        let sender = ParticipantIdFactory::generate();
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_push_to()
            .withf(move |target, event| {
                target.as_uuid() == sender.as_uuid() && matches!(event, RoomEvent::Rejected { .. })
            })
            .times(1)
            .returning(|_, _| Ok(()));
        pusher.expect_broadcast().never();
        let usecase = DispatchCommandUseCase::new(
            Arc::new(InMemoryRoomRepository::new(RoomPolicy::default())),
            Arc::new(pusher),
            Arc::new(FixedClock::new(1_000)),
            true,
        );

        // when (操作): 空の名前で参加
        let result = usecase
            .execute(
                &RoomId::new("default".to_string()).unwrap(),
                RoomCommand::Join {
                    participant_id: sender,
                    name: "  ".to_string(),
                },
            )
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(DispatchError::Rejected(SessionError::InvalidName)));
    }

    #[tokio::test]
    async fn test_silent_mode_never_pushes_rejection() {
        // テスト項目: 既定（silent）モードでは拒否しても何も送信しない
        // given (前提条件):
        let mut pusher = MockMessagePusher::new();
        pusher.expect_push_to().never();
        pusher.expect_broadcast().never();
        let usecase = DispatchCommandUseCase::new(
            Arc::new(InMemoryRoomRepository::new(RoomPolicy::default())),
            Arc::new(pusher),
            Arc::new(FixedClock::new(1_000)),
            false,
        );

        // when (操作): 存在しないルームで投票開始
        let result = usecase
            .execute(
                &RoomId::new("ghost".to_string()).unwrap(),
                RoomCommand::StartVoting {
                    participant_id: ParticipantIdFactory::generate(),
                },
            )
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(DispatchError::Rejected(SessionError::RoomNotFound)));
    }

    #[tokio::test]
    async fn test_countdown_reveals_results_after_delay() {
        // テスト項目: カウントダウン付きでは countdown-start の後、遅延して結果が届く
        // given (前提条件):
        let harness = Harness::new(
            RoomPolicy {
                reveal_delay: Duration::from_millis(50),
                ..RoomPolicy::default()
            },
            false,
        );
        let (a, mut a_rx) = harness.join("A").await;
        harness
            .run(RoomCommand::StartVoting { participant_id: a })
            .await
            .unwrap();
        drain(&mut a_rx);

        // when (操作):
        harness
            .run(RoomCommand::SubmitVote {
                participant_id: a,
                value: 13,
            })
            .await
            .unwrap();

        // then (期待する結果): まだ結果は出ていない
        assert_eq!(
            types(&drain(&mut a_rx)),
            vec!["vote-count", "countdown-start"]
        );

        // 遅延後に結果が公開される
        let frame = tokio::time::timeout(Duration::from_secs(2), a_rx.recv())
            .await
            .expect("reveal should fire")
            .expect("channel should stay open");
        let complete: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(complete["type"], "voting-complete");
        assert_eq!(complete["average"], 13.0);

        let state = tokio::time::timeout(Duration::from_secs(2), a_rx.recv())
            .await
            .unwrap()
            .unwrap();
        let state: serde_json::Value = serde_json::from_str(&state).unwrap();
        assert_eq!(state["phase"], Phase::Results.as_str());
    }

    #[tokio::test]
    async fn test_leave_from_connection_that_never_joined() {
        // テスト項目: join していない接続の leave は何も配信せず、debug レベルで記録される
        // given (前提条件):
        let mut pusher = MockMessagePusher::new();
        pusher.expect_push_to().never();
        pusher.expect_broadcast().never();
        let usecase = DispatchCommandUseCase::new(
            Arc::new(InMemoryRoomRepository::new(RoomPolicy::default())),
            Arc::new(pusher),
            Arc::new(FixedClock::new(1_000)),
            true,
        );

        // when (操作):
        let result = usecase
            .execute(
                &RoomId::new("ghost".to_string()).unwrap(),
                RoomCommand::Leave {
                    participant_id: ParticipantIdFactory::generate(),
                },
            )
            .await;

        // then (期待する結果):
        assert!(result.is_err());
        assert_eq!(
            rejection_level(true, &SessionError::RoomNotFound),
            Level::DEBUG
        );
        assert_eq!(
            rejection_level(true, &SessionError::NotAParticipant),
            Level::DEBUG
        );
        // leave 以外の不整合は引き続き警告する
        assert_eq!(
            rejection_level(false, &SessionError::RoomNotFound),
            Level::WARN
        );
        assert_eq!(
            rejection_level(false, &SessionError::NotAParticipant),
            Level::INFO
        );
    }
}
