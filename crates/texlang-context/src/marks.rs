//! Marks
//!
//! Marks are not scoped by groups: they belong to the document being processed.
//! Each mark class has its own top, first and bottom mark,
//!     and its own split first and split bottom mark (TeX.2021.382).

use std::collections::HashMap;

use crate::types::TokenList;

/// Mark state for one run over a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentRunState {
    top: HashMap<String, TokenList>,
    first: HashMap<String, TokenList>,
    bottom: HashMap<String, TokenList>,
    split_first: HashMap<String, TokenList>,
    split_bottom: HashMap<String, TokenList>,
}

impl DocumentRunState {
    /// Clears all marks, as at the start of a run.
    pub fn reset(&mut self) {
        *self = Default::default();
    }

    /// Records a mark on the current page.
    pub fn set_mark(&mut self, class: &str, mark: TokenList) {
        self.first
            .entry(class.to_string())
            .or_insert_with(|| mark.clone());
        self.bottom.insert(class.to_string(), mark);
    }

    /// Records a mark found by `\vsplit`.
    pub fn set_split_mark(&mut self, class: &str, mark: TokenList) {
        self.split_first
            .entry(class.to_string())
            .or_insert_with(|| mark.clone());
        self.split_bottom.insert(class.to_string(), mark);
    }

    /// Starts a new page: the last mark of the previous page becomes the top mark.
    ///
    /// TeX.2021.1012
    pub fn start_page(&mut self) {
        self.top = self.bottom.clone();
        self.first.clear();
    }

    /// Clears the split marks before a new `\vsplit`.
    ///
    /// TeX.2021.977
    pub fn clear_split_marks(&mut self) {
        self.split_first.clear();
        self.split_bottom.clear();
    }

    pub fn top_mark(&self, class: &str) -> Option<&TokenList> {
        self.top.get(class)
    }

    /// The first mark on the current page, or the top mark if the page has no marks.
    pub fn first_mark(&self, class: &str) -> Option<&TokenList> {
        self.first.get(class).or_else(|| self.top.get(class))
    }

    /// The last mark seen so far; this carries over to later pages without marks.
    pub fn bottom_mark(&self, class: &str) -> Option<&TokenList> {
        self.bottom.get(class)
    }

    pub fn split_first_mark(&self, class: &str) -> Option<&TokenList> {
        self.split_first.get(class)
    }

    pub fn split_bottom_mark(&self, class: &str) -> Option<&TokenList> {
        self.split_bottom.get(class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Token;

    fn mark(c: char) -> TokenList {
        vec![Token::letter(c)]
    }

    #[test]
    fn page_marks() {
        let mut state = DocumentRunState::default();
        assert_eq!(state.first_mark(""), None);

        state.set_mark("", mark('a'));
        state.set_mark("", mark('b'));
        state.set_mark("other", mark('z'));
        assert_eq!(state.top_mark(""), None);
        assert_eq!(state.first_mark(""), Some(&mark('a')));
        assert_eq!(state.bottom_mark(""), Some(&mark('b')));

        state.start_page();
        assert_eq!(state.top_mark(""), Some(&mark('b')));
        assert_eq!(state.first_mark(""), Some(&mark('b')));
        assert_eq!(state.bottom_mark(""), Some(&mark('b')));

        state.set_mark("", mark('c'));
        assert_eq!(state.top_mark(""), Some(&mark('b')));
        assert_eq!(state.first_mark(""), Some(&mark('c')));
        assert_eq!(state.bottom_mark("other"), Some(&mark('z')));
    }

    #[test]
    fn split_marks() {
        let mut state = DocumentRunState::default();
        state.set_split_mark("", mark('a'));
        state.set_split_mark("", mark('b'));
        assert_eq!(state.split_first_mark(""), Some(&mark('a')));
        assert_eq!(state.split_bottom_mark(""), Some(&mark('b')));
        state.clear_split_marks();
        assert_eq!(state.split_first_mark(""), None);
        assert_eq!(state.split_bottom_mark(""), None);
    }

    #[test]
    fn reset_clears_everything() {
        let mut state = DocumentRunState::default();
        state.set_mark("", mark('a'));
        state.start_page();
        state.set_split_mark("", mark('b'));
        state.reset();
        assert_eq!(state, DocumentRunState::default());
    }
}
