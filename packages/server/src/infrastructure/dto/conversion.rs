//! Conversion logic between DTOs and domain entities.

use mitsumori_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::{
    Participant, ParticipantId, Phase, RoomCommand, RoomEvent, RoomSession, RoomSnapshot, Vote,
};
use crate::infrastructure::dto::{
    http::{ParticipantDetailDto, RoomDetailDto, RoomSummaryDto},
    websocket as dto,
};

// ========================================
// DTO → Domain
// ========================================

impl dto::ClientMessage {
    /// 受信メッセージを送信者のコマンドに変換する
    pub fn into_command(self, participant_id: ParticipantId) -> RoomCommand {
        match self {
            dto::ClientMessage::Join { name } => RoomCommand::Join {
                participant_id,
                name,
            },
            dto::ClientMessage::StartVoting => RoomCommand::StartVoting { participant_id },
            dto::ClientMessage::SubmitVote { value } => RoomCommand::SubmitVote {
                participant_id,
                value,
            },
            dto::ClientMessage::NextRound => RoomCommand::NextRound { participant_id },
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<Phase> for dto::PhaseDto {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Waiting => Self::Waiting,
            Phase::Voting => Self::Voting,
            Phase::Results => Self::Results,
        }
    }
}

impl From<&Participant> for dto::ParticipantInfo {
    fn from(model: &Participant) -> Self {
        Self {
            id: model.id.to_string(),
            name: model.name.as_str().to_string(),
            connected: model.connected,
        }
    }
}

impl From<&Vote> for dto::VoteInfo {
    fn from(model: &Vote) -> Self {
        Self {
            participant_id: model.participant_id.to_string(),
            name: model.name.as_str().to_string(),
            value: model.value,
        }
    }
}

impl From<&RoomSnapshot> for dto::ServerMessage {
    fn from(snapshot: &RoomSnapshot) -> Self {
        Self::RoomState {
            room_id: snapshot.room_id.as_str().to_string(),
            participants: snapshot.participants.iter().map(Into::into).collect(),
            phase: snapshot.phase.into(),
            round: snapshot.round,
            votes: snapshot
                .votes
                .as_ref()
                .map(|votes| votes.iter().map(Into::into).collect()),
        }
    }
}

impl From<&RoomEvent> for dto::ServerMessage {
    fn from(event: &RoomEvent) -> Self {
        match event {
            RoomEvent::StateChanged(snapshot) => snapshot.into(),
            RoomEvent::VotingStarted => Self::VotingStarted,
            RoomEvent::VoteProgress {
                voted_count,
                total_players,
            } => Self::VoteCount {
                voted_count: *voted_count,
                total_players: *total_players,
            },
            // 遅延の長さはクライアントのアニメーション側で決まっている
            RoomEvent::CountdownStarted { .. } => Self::CountdownStart,
            RoomEvent::VotingComplete(result) => Self::VotingComplete {
                votes: result.votes.iter().map(Into::into).collect(),
                average: result.average,
            },
            RoomEvent::Rejected { reason } => Self::Rejected {
                reason: reason.clone(),
            },
        }
    }
}

impl From<&RoomSession> for RoomSummaryDto {
    fn from(session: &RoomSession) -> Self {
        Self {
            id: session.id.as_str().to_string(),
            participants: session
                .participants()
                .iter()
                .map(|p| p.name.as_str().to_string())
                .collect(),
            phase: session.phase().into(),
            created_at: timestamp_to_jst_rfc3339(session.created_at.value()),
        }
    }
}

impl From<&RoomSession> for RoomDetailDto {
    fn from(session: &RoomSession) -> Self {
        let has_voted =
            |id: &ParticipantId| session.votes().iter().any(|v| &v.participant_id == id);

        Self {
            id: session.id.as_str().to_string(),
            phase: session.phase().into(),
            round: session.round(),
            participants: session
                .participants()
                .iter()
                .map(|p| ParticipantDetailDto {
                    id: p.id.to_string(),
                    name: p.name.as_str().to_string(),
                    joined_at: timestamp_to_jst_rfc3339(p.joined_at.value()),
                    has_voted: has_voted(&p.id),
                })
                .collect(),
            voted_count: session.votes().len(),
            deck: session.policy().deck.values().to_vec(),
            created_at: timestamp_to_jst_rfc3339(session.created_at.value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DisplayName, ParticipantIdFactory, RoomId, RoomPolicy, RoundResult, Timestamp,
    };
    use std::time::Duration;

    fn participant(name: &str) -> Participant {
        Participant::new(
            ParticipantIdFactory::generate(),
            DisplayName::new(name).unwrap(),
            Timestamp::new(1_000),
        )
    }

    #[test]
    fn test_client_message_into_command() {
        // テスト項目: 受信メッセージが送信者付きのコマンドに変換される
        // given (前提条件):
        let participant_id = ParticipantIdFactory::generate();
        let message = dto::ClientMessage::SubmitVote { value: 5 };

        // when (操作):
        let command = message.into_command(participant_id);

        // then (期待する結果):
        assert_eq!(
            command,
            RoomCommand::SubmitVote {
                participant_id,
                value: 5
            }
        );
    }

    #[test]
    fn test_snapshot_to_room_state() {
        // テスト項目: 状態スナップショットが room-state メッセージに変換される
        // given (前提条件):
        let alice = participant("Alice");
        let snapshot = RoomSnapshot {
            room_id: RoomId::new("default".to_string()).unwrap(),
            participants: vec![alice.clone()],
            phase: Phase::Results,
            round: 3,
            votes: Some(vec![Vote {
                participant_id: alice.id,
                name: alice.name.clone(),
                value: 8,
            }]),
        };

        // when (操作):
        let message: dto::ServerMessage = (&RoomEvent::StateChanged(snapshot)).into();

        // then (期待する結果):
        match message {
            dto::ServerMessage::RoomState {
                room_id,
                participants,
                phase,
                round,
                votes,
            } => {
                assert_eq!(room_id, "default");
                assert_eq!(participants[0].name, "Alice");
                assert_eq!(participants[0].id, alice.id.to_string());
                assert!(participants[0].connected);
                assert_eq!(phase, dto::PhaseDto::Results);
                assert_eq!(round, 3);
                assert_eq!(votes.unwrap()[0].value, 8);
            }
            other => panic!("expected room-state, got {other:?}"),
        }
    }

    #[test]
    fn test_events_to_messages() {
        // テスト項目: 各イベントが対応するメッセージに変換される
        // given (前提条件):
        let alice = participant("Alice");
        let result = RoundResult {
            votes: vec![Vote {
                participant_id: alice.id,
                name: alice.name.clone(),
                value: 13,
            }],
            average: 13.0,
        };

        // when (操作) / then (期待する結果):
        assert_eq!(
            dto::ServerMessage::from(&RoomEvent::VotingStarted),
            dto::ServerMessage::VotingStarted
        );
        assert_eq!(
            dto::ServerMessage::from(&RoomEvent::CountdownStarted {
                round: 1,
                delay: Duration::from_secs(3),
            }),
            dto::ServerMessage::CountdownStart
        );
        assert_eq!(
            dto::ServerMessage::from(&RoomEvent::VoteProgress {
                voted_count: 2,
                total_players: 3,
            }),
            dto::ServerMessage::VoteCount {
                voted_count: 2,
                total_players: 3,
            }
        );
        assert_eq!(
            dto::ServerMessage::from(&RoomEvent::VotingComplete(result)),
            dto::ServerMessage::VotingComplete {
                votes: vec![dto::VoteInfo {
                    participant_id: alice.id.to_string(),
                    name: "Alice".to_string(),
                    value: 13,
                }],
                average: 13.0,
            }
        );
    }

    #[test]
    fn test_session_to_http_dtos() {
        // テスト項目: RoomSession が HTTP のサマリー・詳細 DTO に変換される
        // given (前提条件):
        let room_id = RoomId::new("alpha".to_string()).unwrap();
        let mut session = RoomSession::new(
            room_id,
            Timestamp::new(1672498800000),
            RoomPolicy::default(),
        );
        let alice = ParticipantIdFactory::generate();
        let now = Timestamp::new(1672498800000);
        session
            .apply(
                RoomCommand::Join {
                    participant_id: alice,
                    name: "Alice".to_string(),
                },
                now,
            )
            .unwrap();
        session
            .apply(
                RoomCommand::Join {
                    participant_id: ParticipantIdFactory::generate(),
                    name: "Bob".to_string(),
                },
                now,
            )
            .unwrap();
        session
            .apply(RoomCommand::StartVoting { participant_id: alice }, now)
            .unwrap();
        session
            .apply(
                RoomCommand::SubmitVote {
                    participant_id: alice,
                    value: 5,
                },
                now,
            )
            .unwrap();

        // when (操作):
        let summary = RoomSummaryDto::from(&session);
        let detail = RoomDetailDto::from(&session);

        // then (期待する結果):
        assert_eq!(summary.id, "alpha");
        assert_eq!(summary.participants, vec!["Alice", "Bob"]);
        assert_eq!(summary.phase, dto::PhaseDto::Voting);
        assert!(summary.created_at.starts_with("2023-01-01T00:00:00"));

        assert_eq!(detail.round, 1);
        assert_eq!(detail.voted_count, 1);
        assert!(detail.participants[0].has_voted);
        assert!(!detail.participants[1].has_voted);
        assert_eq!(detail.deck, vec![1, 2, 3, 5, 8, 13, 21, 34, 55, 89]);
    }
}
