//! 다중 선택 상태
//!
//! 입력 장치와 무관한 순수 상태 전이만 제공합니다.
//! 각 전이는 현재 상태를 빌려 다음 상태를 새로 만들어 반환합니다.

use crate::models::file_entry::FileEntry;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    indices: BTreeSet<usize>,
    /// 범위 선택 기준점 (마지막으로 토글/범위 지정한 위치)
    anchor: Option<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 선택 가능한 인덱스인지 (범위 안, ".." 아님)
    fn selectable(entries: &[FileEntry], index: usize) -> bool {
        entries.get(index).is_some_and(|entry| !entry.is_parent())
    }

    /// 단일 항목 선택 토글
    pub fn toggle(&self, index: usize, entries: &[FileEntry]) -> Selection {
        if !Self::selectable(entries, index) {
            return self.clone();
        }
        let mut next = self.clone();
        if !next.indices.remove(&index) {
            next.indices.insert(index);
        }
        next.anchor = Some(index);
        next
    }

    /// [min(anchor, index), max(anchor, index)] 구간을 선택에 추가
    pub fn range_select(&self, anchor: usize, index: usize, entries: &[FileEntry]) -> Selection {
        if entries.is_empty() {
            return self.clone();
        }
        let last = entries.len() - 1;
        let start = anchor.min(index).min(last);
        let end = anchor.max(index).min(last);

        let mut next = self.clone();
        next.indices
            .extend((start..=end).filter(|&i| Self::selectable(entries, i)));
        next.anchor = Some(index.min(last));
        next
    }

    /// ".."을 제외한 모든 항목 선택
    pub fn select_all(&self, entries: &[FileEntry]) -> Selection {
        Selection {
            indices: (0..entries.len())
                .filter(|&i| Self::selectable(entries, i))
                .collect(),
            anchor: self.anchor,
        }
    }

    pub fn cleared() -> Selection {
        Selection::default()
    }

    /// 목록 재로딩 후 범위를 벗어난 인덱스 제거
    pub fn clamp(&self, entries: &[FileEntry]) -> Selection {
        Selection {
            indices: self
                .indices
                .iter()
                .copied()
                .filter(|&i| Self::selectable(entries, i))
                .collect(),
            anchor: self.anchor.filter(|&a| a < entries.len()),
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    /// 오름차순 인덱스
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }
}
