#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PopupState {
    visible: bool,
}

impl PopupState {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    // Returns the visibility after the toggle.
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn on_escape(&mut self) -> bool {
        let was_visible = self.visible;
        self.visible = false;
        was_visible
    }
}

// With nothing selected, moving down picks the first row and moving up keeps
// the list unselected.
pub fn next_selection_index(current: Option<usize>, len: usize, direction: i32) -> Option<usize> {
    if len == 0 {
        return None;
    }

    let max = len - 1;
    match current {
        None if direction > 0 => Some(0),
        None => None,
        Some(index) if direction < 0 => Some(index.min(max).saturating_sub(1)),
        Some(index) if direction > 0 => Some((index + 1).min(max)),
        Some(index) => Some(index.min(max)),
    }
}

// `cursor` is a char offset. Whitespace between the word and the cursor goes too.
pub fn delete_word_before(text: &str, cursor: usize) -> (String, usize) {
    let chars: Vec<char> = text.chars().collect();
    let pos = cursor.min(chars.len());
    if pos == 0 {
        return (text.to_string(), 0);
    }

    let mut start = pos - 1;
    while start > 0 && chars[start].is_whitespace() {
        start -= 1;
    }
    while start > 0 && !chars[start - 1].is_whitespace() {
        start -= 1;
    }

    let remaining: String = chars[..start].iter().chain(&chars[pos..]).collect();
    (remaining, start)
}

#[cfg(test)]
mod tests {
    use super::{delete_word_before, next_selection_index, PopupState};

    #[test]
    fn toggle_alternates_visibility() {
        let mut state = PopupState::default();
        assert!(!state.is_visible());
        assert!(state.toggle());
        assert!(!state.toggle());
        assert!(state.toggle());
        assert!(state.is_visible());
    }

    #[test]
    fn escape_reports_whether_it_hid_anything() {
        let mut state = PopupState::default();
        assert!(!state.on_escape());
        state.toggle();
        assert!(state.on_escape());
        assert!(!state.is_visible());
    }

    #[test]
    fn hide_is_idempotent() {
        let mut state = PopupState::default();
        state.hide();
        assert!(!state.is_visible());
        state.toggle();
        state.hide();
        state.hide();
        assert!(!state.is_visible());
    }

    #[test]
    fn selection_index_bounds_are_stable() {
        assert_eq!(next_selection_index(Some(0), 0, 1), None);
        assert_eq!(next_selection_index(Some(0), 3, -1), Some(0));
        assert_eq!(next_selection_index(Some(1), 3, -1), Some(0));
        assert_eq!(next_selection_index(Some(1), 3, 1), Some(2));
        assert_eq!(next_selection_index(Some(2), 3, 1), Some(2));
        assert_eq!(next_selection_index(Some(1), 3, 0), Some(1));
        assert_eq!(next_selection_index(Some(5), 3, 0), Some(2));
    }

    #[test]
    fn unselected_list_only_moves_down() {
        assert_eq!(next_selection_index(None, 3, 1), Some(0));
        assert_eq!(next_selection_index(None, 3, -1), None);
        assert_eq!(next_selection_index(None, 0, 1), None);
    }

    #[test]
    fn delete_word_removes_trailing_word() {
        assert_eq!(delete_word_before("hello world", 11), ("hello ".to_string(), 6));
        assert_eq!(delete_word_before("hello world  ", 13), ("hello ".to_string(), 6));
        assert_eq!(delete_word_before("single", 6), (String::new(), 0));
    }

    #[test]
    fn delete_word_keeps_text_after_cursor() {
        assert_eq!(delete_word_before("one two three", 7), ("one  three".to_string(), 4));
    }

    #[test]
    fn delete_word_at_start_is_noop() {
        assert_eq!(delete_word_before("abc", 0), ("abc".to_string(), 0));
        assert_eq!(delete_word_before("", 4), (String::new(), 0));
    }
}
