//! Room session aggregate
//!
//! 1 つのルームの権威ある状態（参加者、現在のラウンドの投票、フェーズ）と
//! その状態遷移を持つ。I/O は一切行わない。
//!
//! ## 不変条件
//!
//! - 投票のキーは必ず現在の参加者の部分集合
//! - 投票数は参加者数を超えない
//! - フェーズは `Waiting` / `Voting` / `Results` のいずれか
//! - デッキ外の値は記録されない
//!
//! 全ての操作は `apply` を通して直列に適用され、エラー時は状態を一切変更しない。

use std::time::Duration;

use super::{
    command::RoomCommand,
    deck::Deck,
    entity::{Participant, Phase, Vote},
    error::SessionError,
    event::{RoomEvent, RoomSnapshot, Transition},
    tally::tally,
    value_object::{DisplayName, ParticipantId, RoomId, Timestamp},
};

/// ルームごとの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomPolicy {
    /// 投票可能な値
    pub deck: Deck,
    /// 投票開始に必要な参加者数（1 なら無条件）
    pub min_participants_to_start: usize,
    /// 全員の投票後、結果を公開するまでの待ち時間（0 なら即時）
    pub reveal_delay: Duration,
}

impl Default for RoomPolicy {
    fn default() -> Self {
        Self {
            deck: Deck::default(),
            min_participants_to_start: 1,
            reveal_delay: Duration::ZERO,
        }
    }
}

/// 公開待ちのラウンド
///
/// カウントダウン開始時点の投票を保持する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReveal {
    pub round: u64,
    pub votes: Vec<Vote>,
}

/// Room Session
#[derive(Debug, Clone)]
pub struct RoomSession {
    pub id: RoomId,
    pub created_at: Timestamp,
    policy: RoomPolicy,
    /// 参加順
    participants: Vec<Participant>,
    /// 投票順
    votes: Vec<Vote>,
    phase: Phase,
    round: u64,
    pending_reveal: Option<PendingReveal>,
    emptied_at: Option<Timestamp>,
}

impl RoomSession {
    /// 空のルームを作成
    pub fn new(id: RoomId, created_at: Timestamp, policy: RoomPolicy) -> Self {
        Self {
            id,
            created_at,
            policy,
            participants: Vec::new(),
            votes: Vec::new(),
            phase: Phase::Waiting,
            round: 0,
            pending_reveal: None,
            emptied_at: Some(created_at),
        }
    }

    pub fn policy(&self) -> &RoomPolicy {
        &self.policy
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn pending_reveal(&self) -> Option<&PendingReveal> {
        self.pending_reveal.as_ref()
    }

    pub fn participant_ids(&self) -> Vec<ParticipantId> {
        self.participants.iter().map(|p| p.id).collect()
    }

    pub fn is_participant(&self, participant_id: &ParticipantId) -> bool {
        self.participants.iter().any(|p| &p.id == participant_id)
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// 参加者がいない状態が `grace` 以上続いているか
    ///
    /// 公開待ちのラウンドがある間はアイドル扱いしない。
    pub fn is_idle(&self, now: Timestamp, grace: Duration) -> bool {
        self.pending_reveal.is_none()
            && self
                .emptied_at
                .is_some_and(|since| u128::from(now.millis_since(since)) >= grace.as_millis())
    }

    /// 現在の状態のスナップショット
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            room_id: self.id.clone(),
            participants: self.participants.clone(),
            phase: self.phase,
            round: self.round,
            votes: (self.phase == Phase::Results).then(|| self.votes.clone()),
        }
    }

    /// コマンドを適用し、配信すべきイベントと配信先を返す
    ///
    /// # Errors
    ///
    /// 前提条件を満たさない場合は `SessionError` を返し、状態は変更されない。
    pub fn apply(
        &mut self,
        command: RoomCommand,
        now: Timestamp,
    ) -> Result<Transition, SessionError> {
        let events = match command {
            RoomCommand::Join {
                participant_id,
                name,
            } => self.join(participant_id, &name, now)?,
            RoomCommand::StartVoting { participant_id } => self.start_voting(&participant_id)?,
            RoomCommand::SubmitVote {
                participant_id,
                value,
            } => self.submit_vote(&participant_id, value)?,
            RoomCommand::NextRound { participant_id } => self.next_round(&participant_id)?,
            RoomCommand::Leave { participant_id } => self.leave(&participant_id, now)?,
            RoomCommand::Reveal { round } => self.reveal(round)?,
        };

        Ok(Transition {
            events,
            recipients: self.participant_ids(),
        })
    }

    fn join(
        &mut self,
        participant_id: ParticipantId,
        name: &str,
        now: Timestamp,
    ) -> Result<Vec<RoomEvent>, SessionError> {
        let name = DisplayName::new(name).map_err(|_| SessionError::InvalidName)?;

        match self
            .participants
            .iter_mut()
            .find(|p| p.id == participant_id)
        {
            Some(existing) => {
                existing.name = name;
                existing.connected = true;
            }
            None => self
                .participants
                .push(Participant::new(participant_id, name, now)),
        }
        self.emptied_at = None;

        Ok(vec![RoomEvent::StateChanged(self.snapshot())])
    }

    fn start_voting(
        &mut self,
        participant_id: &ParticipantId,
    ) -> Result<Vec<RoomEvent>, SessionError> {
        self.ensure_participant(participant_id)?;
        self.ensure_phase(Phase::Waiting)?;

        let required = self.policy.min_participants_to_start;
        if self.participants.len() < required {
            return Err(SessionError::NotEnoughParticipants {
                required,
                actual: self.participants.len(),
            });
        }

        self.phase = Phase::Voting;
        self.round += 1;
        self.votes.clear();
        self.pending_reveal = None;

        Ok(vec![
            RoomEvent::VotingStarted,
            RoomEvent::StateChanged(self.snapshot()),
        ])
    }

    fn submit_vote(
        &mut self,
        participant_id: &ParticipantId,
        value: u32,
    ) -> Result<Vec<RoomEvent>, SessionError> {
        self.ensure_phase(Phase::Voting)?;
        let name = self
            .participants
            .iter()
            .find(|p| &p.id == participant_id)
            .map(|p| p.name.clone())
            .ok_or(SessionError::NotAParticipant)?;
        if !self.policy.deck.contains(value) {
            return Err(SessionError::ValueNotInDeck(value));
        }

        match self
            .votes
            .iter_mut()
            .find(|v| &v.participant_id == participant_id)
        {
            Some(existing) => {
                existing.name = name;
                existing.value = value;
            }
            None => self.votes.push(Vote {
                participant_id: *participant_id,
                name,
                value,
            }),
        }

        let voted_count = self.votes.len();
        let total_players = self.participants.len();
        let mut events = vec![RoomEvent::VoteProgress {
            voted_count,
            total_players,
        }];

        if total_players > 0 && voted_count == total_players {
            if self.policy.reveal_delay.is_zero() {
                let snapshot = self.votes.clone();
                events.extend(self.finalize(snapshot));
            } else if self.pending_reveal.is_none() {
                self.pending_reveal = Some(PendingReveal {
                    round: self.round,
                    votes: self.votes.clone(),
                });
                events.push(RoomEvent::CountdownStarted {
                    round: self.round,
                    delay: self.policy.reveal_delay,
                });
            }
        }

        Ok(events)
    }

    fn reveal(&mut self, round: u64) -> Result<Vec<RoomEvent>, SessionError> {
        let is_current = self.phase == Phase::Voting
            && self
                .pending_reveal
                .as_ref()
                .is_some_and(|pending| pending.round == round);
        if !is_current {
            return Err(SessionError::StaleReveal { round });
        }

        let snapshot = self
            .pending_reveal
            .take()
            .map(|pending| pending.votes)
            .unwrap_or_default();
        Ok(self.finalize(snapshot))
    }

    /// `Results` に遷移し、スナップショットから結果を確定する
    fn finalize(&mut self, snapshot: Vec<Vote>) -> Vec<RoomEvent> {
        self.phase = Phase::Results;
        self.votes = snapshot
            .iter()
            .filter(|v| self.is_participant(&v.participant_id))
            .cloned()
            .collect();

        let mut events = Vec::with_capacity(2);
        if let Some(result) = tally(snapshot) {
            events.push(RoomEvent::VotingComplete(result));
        }
        events.push(RoomEvent::StateChanged(self.snapshot()));
        events
    }

    fn next_round(&mut self, participant_id: &ParticipantId) -> Result<Vec<RoomEvent>, SessionError> {
        self.ensure_participant(participant_id)?;

        self.phase = Phase::Waiting;
        self.votes.clear();
        self.pending_reveal = None;

        Ok(vec![RoomEvent::StateChanged(self.snapshot())])
    }

    fn leave(
        &mut self,
        participant_id: &ParticipantId,
        now: Timestamp,
    ) -> Result<Vec<RoomEvent>, SessionError> {
        let index = self
            .participants
            .iter()
            .position(|p| &p.id == participant_id)
            .ok_or(SessionError::NotAParticipant)?;

        self.participants.remove(index);
        self.votes.retain(|v| &v.participant_id != participant_id);
        if self.participants.is_empty() {
            self.emptied_at = Some(now);
        }

        Ok(vec![RoomEvent::StateChanged(self.snapshot())])
    }

    fn ensure_participant(&self, participant_id: &ParticipantId) -> Result<(), SessionError> {
        if self.is_participant(participant_id) {
            Ok(())
        } else {
            Err(SessionError::NotAParticipant)
        }
    }

    fn ensure_phase(&self, expected: Phase) -> Result<(), SessionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(SessionError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }
}
