//! Deck of allowed estimate values.

use super::error::ValueObjectError;

/// 見積もりに使えるカードの集合
///
/// デプロイごとに固定される設定値で、プロトコル上で交渉されることはない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    values: Vec<u32>,
}

impl Deck {
    /// 任意の値からデッキを作る（重複は除去され昇順に並ぶ）
    pub fn new(mut values: Vec<u32>) -> Result<Self, ValueObjectError> {
        values.sort_unstable();
        values.dedup();
        if values.is_empty() {
            return Err(ValueObjectError::DeckEmpty);
        }
        Ok(Self { values })
    }

    /// {1, 2, 3, 5, 10}
    pub fn linear() -> Self {
        Self {
            values: vec![1, 2, 3, 5, 10],
        }
    }

    /// {1, 2, 3, 5, 8, 13, 21, 34, 55, 89}
    pub fn fibonacci() -> Self {
        Self {
            values: vec![1, 2, 3, 5, 8, 13, 21, 34, 55, 89],
        }
    }

    pub fn contains(&self, value: u32) -> bool {
        self.values.binary_search(&value).is_ok()
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::fibonacci()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_deck_membership() {
        // テスト項目: linear デッキは 1,2,3,5,10 のみを含む
        // given (前提条件):
        let deck = Deck::linear();

        // when (操作) / then (期待する結果):
        for value in [1, 2, 3, 5, 10] {
            assert!(deck.contains(value), "{value} should be in the deck");
        }
        for value in [0, 4, 8, 13] {
            assert!(!deck.contains(value), "{value} should not be in the deck");
        }
    }

    #[test]
    fn test_fibonacci_deck_membership() {
        // テスト項目: fibonacci デッキは 89 を含み 100 を含まない
        // given (前提条件):
        let deck = Deck::fibonacci();

        // when (操作) / then (期待する結果):
        assert!(deck.contains(89));
        assert!(deck.contains(8));
        assert!(!deck.contains(10));
        assert!(!deck.contains(100));
    }

    #[test]
    fn test_custom_deck_is_sorted_and_deduplicated() {
        // テスト項目: 任意のデッキは昇順・重複なしに正規化される
        // given (前提条件):
        let values = vec![8, 1, 3, 1, 20];

        // when (操作):
        let deck = Deck::new(values).unwrap();

        // then (期待する結果):
        assert_eq!(deck.values(), &[1, 3, 8, 20]);
        assert!(deck.contains(20));
    }

    #[test]
    fn test_empty_deck_is_rejected() {
        // テスト項目: 空のデッキは作れない
        // given (前提条件) / when (操作):
        let result = Deck::new(Vec::new());

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::DeckEmpty));
    }
}
