//! Label list rendering.

use std::io::{self, Write};

use crate::store::AppView;

/// Render the label list. The active filter is marked with `>`; the
/// "all" row is marked when no filter is set.
pub fn render(view: &AppView, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Labels")?;
    let marker = |active: bool| if active { '>' } else { ' ' };

    writeln!(out, "{} all", marker(view.filter_label_id.is_none()))?;
    for label in &view.labels {
        let active = view.filter_label_id == Some(label.id);
        writeln!(out, "{} {}  {}", marker(active), label.id, label.name)?;
    }
    Ok(())
}
