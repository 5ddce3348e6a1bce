//! 行選択の管理
//!
//! 選択は導出ビュー上の位置で持つ（レコードの同一性ではない）。
//! ビューの件数が変わったらリセットする。件数が同じまま並びだけ変わった
//! 場合は選択が残り、別のレコードを指すことがある。

use std::collections::BTreeSet;

/// 選択中の位置集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    selected: BTreeSet<usize>,
    view_len: usize,
}

impl SelectionSet {
    /// ビュー件数を指定して空の選択を作る
    pub fn new(view_len: usize) -> Self {
        Self { selected: BTreeSet::new(), view_len }
    }

    /// 現在のビュー件数
    pub fn view_len(&self) -> usize {
        self.view_len
    }

    /// 位置の選択を反転する。範囲外は無視
    pub fn toggle(&mut self, position: usize) {
        if position >= self.view_len {
            return;
        }
        if !self.selected.remove(&position) {
            self.selected.insert(position);
        }
    }

    /// 全選択でなければ全選択、全選択なら全解除
    pub fn toggle_all(&mut self) {
        if self.is_all_selected() {
            self.selected.clear();
        } else {
            self.selected = (0..self.view_len).collect();
        }
    }

    pub fn reset(&mut self) {
        self.selected.clear();
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_selected(&self, position: usize) -> bool {
        self.selected.contains(&position)
    }

    /// 空でないビューの全位置が選択されているか
    pub fn is_all_selected(&self) -> bool {
        self.view_len > 0 && self.selected.len() == self.view_len
    }

    /// 選択位置（昇順）
    pub fn positions(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }

    /// ビュー件数を同期する
    ///
    /// # Returns
    /// 件数が変わって選択をリセットした場合 true
    pub fn sync(&mut self, view_len: usize) -> bool {
        if view_len == self.view_len {
            return false;
        }
        self.view_len = view_len;
        self.selected.clear();
        true
    }
}
