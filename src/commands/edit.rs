//! Edit an existing post

use anyhow::Result;
use std::ops::Range;

use super::PostFields;
use crate::editor::{EditForm, Format};
use crate::Wabisabi;

/// A toolbar action applied to part of the content
#[derive(Debug, Clone)]
pub struct FormatAction {
    pub format: Format,
    pub selection: Range<usize>,
}

/// Update the fields of the post `slug`, optionally applying a toolbar
/// action to its content afterwards
pub fn edit_post(
    app: &Wabisabi,
    slug: &str,
    fields: &PostFields,
    action: Option<&FormatAction>,
) -> Result<()> {
    let mut session = app.session();
    session.set_edit_mode(true);

    let mut form = EditForm::from_post(session.begin_edit(slug)?);
    fields.apply(&mut form);
    session.update_draft(&form)?;

    if let Some(action) = action {
        session.format_draft(action.selection.clone(), action.format)?;
    }

    let saved = session.save_draft()?;
    println!("Updated: {}", saved);
    Ok(())
}

/// Parse a `START:END` character range
pub fn parse_selection(s: &str) -> Result<Range<usize>> {
    let (start, end) = s
        .split_once(':')
        .ok_or_else(|| anyhow::anyhow!("Selection must look like START:END, got {}", s))?;
    Ok(start.trim().parse()?..end.trim().parse()?)
}
