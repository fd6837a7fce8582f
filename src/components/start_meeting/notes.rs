pub const MEMBERS_HEADING: &str = "# Members";
pub const TASKS_HEADING: &str = "# Task contents";
pub const SHARED_HEADING: &str = "# Shared notes";

/// Render the start meeting template for the given members.
///
/// Every member is listed under "Members" and again under "Task contents"
/// with an empty sub-bullet to fill in; "Shared notes" is left empty.
pub fn render_note(members: &[String]) -> String {
    let mut text = String::new();

    text.push_str(MEMBERS_HEADING);
    text.push('\n');
    for member in members {
        text.push_str(&format!("- {}\n", member));
    }

    text.push('\n');
    text.push_str(TASKS_HEADING);
    text.push('\n');
    for member in members {
        text.push_str(&format!("- {}\n", member));
        text.push_str("  - \n");
    }

    text.push('\n');
    text.push_str(SHARED_HEADING);
    text.push('\n');

    text
}
