//! Result computation for a completed round.

use super::entity::{RoundResult, Vote};

/// 平均値を小数第 1 位に丸める（小数第 2 位で四捨五入）
///
/// 浮動小数の誤差を避けるため整数演算で丸める。投票が 0 件なら `None`。
pub fn average_of(values: &[u32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let sum: u64 = values.iter().map(|&v| u64::from(v)).sum();
    let count = values.len() as u64;

    // round-half-up of (sum * 10 / count)
    let tenths = (sum * 20 + count) / (count * 2);
    Some(tenths as f64 / 10.0)
}

/// 投票一覧から結果を作る
pub fn tally(votes: Vec<Vote>) -> Option<RoundResult> {
    let values: Vec<u32> = votes.iter().map(|v| v.value).collect();
    let average = average_of(&values)?;
    Some(RoundResult { votes, average })
}
