//! Enrolled class listings

use crate::models::ClassInfo;

/// List the active classes with the ids needed to select one
pub fn render_class_list(classes: &[ClassInfo]) -> String {
    if classes.is_empty() {
        return String::from("No enrolled classes found.");
    }
    let active: Vec<&ClassInfo> = classes.iter().filter(|c| c.is_active()).collect();
    if active.is_empty() {
        return String::from("No active classes found.");
    }

    let mut lines = Vec::new();
    for class in active {
        let mut line = format!("- **{}**", class.name.as_deref().unwrap_or("Unknown"));
        if !class.course_number.is_empty() {
            line.push_str(&format!(" ({})", class.course_number));
        }
        if !class.term.is_empty() {
            line.push_str(&format!(" — {}", class.term));
        }
        line.push_str(&format!("\n  network_id: `{}`", class.id));
        lines.push(line);
    }
    lines.join("\n")
}

/// Confirmation for a newly selected class, listing its folders
pub fn render_class_selected(class: &ClassInfo) -> String {
    let name = class.name.as_deref().unwrap_or_default();
    let class_name = if class.term.is_empty() {
        name.to_string()
    } else {
        format!("{} — {}", name, class.term)
    };

    let mut lines = vec![
        format!("Active class: **{}**", class_name),
        String::new(),
        String::from("Available folders:"),
    ];
    if class.folders.is_empty() {
        lines.push(String::from("(no folders found)"));
    }
    for folder in &class.folders {
        lines.push(format!("- {}", folder));
    }
    lines.join("\n")
}
