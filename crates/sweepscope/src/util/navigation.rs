//! List navigation helpers shared by the panels

use crossterm::event::{KeyCode, KeyEvent};

/// Scroll offset that keeps the selected row centered when possible
pub fn calculate_centered_scroll(selected_idx: usize, total_items: usize, visible_count: usize) -> usize {
    if total_items <= visible_count {
        return 0;
    }

    let center = visible_count / 2;
    if selected_idx <= center {
        0
    } else if selected_idx >= total_items.saturating_sub(visible_count.saturating_sub(center)) {
        total_items.saturating_sub(visible_count)
    } else {
        selected_idx.saturating_sub(center)
    }
}

/// Handle j/k or Up/Down, wrapping at both ends. Returns whether the key was used.
pub fn handle_list_navigation(key: &KeyEvent, selected: &mut usize, total: usize) -> bool {
    if total == 0 {
        return false;
    }

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            *selected = (*selected + 1) % total;
            true
        }
        KeyCode::Char('k') | KeyCode::Up => {
            *selected = if *selected == 0 { total - 1 } else { *selected - 1 };
            true
        }
        _ => false,
    }
}
