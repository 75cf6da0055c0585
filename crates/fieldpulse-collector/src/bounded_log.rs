//! 제한 롤링 로그.
//!
//! 상한(`max_len`)을 넘으면 가장 오래된 항목부터 버려 `trim_to` 개만 남긴다.
//! 매 push마다 한 개씩 밀어내는 슬라이딩 윈도우가 아니라,
//! 상한/하한 한 쌍으로 트림 비용을 분산시키는 방식이다.

use std::collections::VecDeque;

/// 제한 롤링 로그 (FIFO)
#[derive(Debug, Clone)]
pub struct BoundedLog<T> {
    entries: VecDeque<T>,
    max_len: usize,
    trim_to: usize,
}

impl<T> BoundedLog<T> {
    /// 새 로그 생성
    ///
    /// `trim_to`는 `max_len` 이하로 보정된다.
    pub fn new(max_len: usize, trim_to: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_len + 1),
            max_len,
            trim_to: trim_to.min(max_len),
        }
    }

    /// 항목 추가, 상한 초과 시 오래된 항목 제거
    ///
    /// 트림으로 제거된 항목 수를 반환한다.
    pub fn push(&mut self, entry: T) -> usize {
        self.entries.push_back(entry);
        if self.entries.len() > self.max_len {
            let dropped = self.entries.len() - self.trim_to;
            self.entries.drain(..dropped);
            dropped
        } else {
            0
        }
    }

    /// 최근 `n`개 (시간순)
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &T> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip)
    }

    pub fn first(&self) -> Option<&T> {
        self.entries.front()
    }

    pub fn last(&self) -> Option<&T> {
        self.entries.back()
    }

    pub fn last_mut(&mut self) -> Option<&mut T> {
        self.entries.back_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

}

impl<T: Clone> BoundedLog<T> {
    /// 최근 `n`개 복제 (시간순)
    pub fn recent_cloned(&self, n: usize) -> Vec<T> {
        self.recent(n).cloned().collect()
    }

    /// 전체 복제 (시간순)
    pub fn to_vec(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }
}
