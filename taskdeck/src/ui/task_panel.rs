//! Task list rendering.

use std::io::{self, Write};

use crate::store::AppView;

/// Render the tasks that pass the active filter.
///
/// The header shows the visible count, and the total plus the filter name
/// when a filter is active.
pub fn render(view: &AppView, out: &mut impl Write) -> io::Result<()> {
    let visible: Vec<_> = view.visible_tasks().collect();

    match view.filter_label_id {
        Some(id) => {
            let name = view
                .filter_label()
                .map_or_else(|| format!("#{id}"), |label| label.name.clone());
            writeln!(
                out,
                "Tasks ({} of {})  [filter: {name}]",
                visible.len(),
                view.tasks.len()
            )?;
        }
        None => writeln!(out, "Tasks ({})", visible.len())?,
    }

    if visible.is_empty() {
        return writeln!(out, "  (none)");
    }

    for task in visible {
        let checkbox = if task.completed { "[x]" } else { "[ ]" };
        write!(out, "  {checkbox} {}  {}", task.id, task.text)?;
        if !task.labels.is_empty() {
            let chips: Vec<String> = task
                .labels
                .iter()
                .map(|label| format!("#{}", label.name))
                .collect();
            write!(out, "  {}", chips.join(" "))?;
        }
        writeln!(out)?;
    }
    Ok(())
}
