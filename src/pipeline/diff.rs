use crate::types::{Change, Delta, Field, Snapshot};

pub const MESSAGE_HEADER: &str = "**Tracker Update Detected:**";

/// Computes the delta from `old` to `new`.
///
/// Order: all removals, then all additions, then field changes of common
/// identities. Each group is sorted by identity; field changes of one identity
/// follow the order of [`Field::ALL`].
pub fn diff(old: &Snapshot, new: &Snapshot) -> Delta {
    let mut changes = Vec::new();

    // Snapshot iterates identities in ascending order
    changes.extend(
        old.identities()
            .filter(|id| !new.contains(id))
            .map(|id| Change::Removed(id.to_string())),
    );
    changes.extend(
        new.identities()
            .filter(|id| !old.contains(id))
            .map(|id| Change::Added(id.to_string())),
    );

    for old_record in old.records() {
        let Some(new_record) = new.get(&old_record.identity) else {
            continue;
        };
        for field in Field::ALL {
            if field.value(old_record) != field.value(new_record) {
                changes.push(Change::FieldChanged(old_record.identity.clone(), field));
            }
        }
    }
    changes
}

/// One human readable line per change.
pub fn describe(change: &Change) -> String {
    match change {
        Change::Removed(id) => format!("❌ Removed: **{}**", id),
        Change::Added(id) => format!("➕ Added: **{}**", id),
        Change::FieldChanged(id, Field::Link) => format!("🔗 Link changed for **{}**", id),
        Change::FieldChanged(id, Field::Credit) => format!("✏️ Credit changed for **{}**", id),
        Change::FieldChanged(id, Field::Availability) => format!("🔄 Links Work status changed for **{}**", id),
        Change::FieldChanged(id, Field::LastUpdated) => format!("🕒 Updated date changed for **{}**", id),
        Change::FieldChanged(id, Field::Featured) => format!("⭐ Best flag changed for **{}**", id),
    }
}

/// Notification body for a non-empty delta.
pub fn render_message(delta: &[Change]) -> String {
    let mut message = String::from(MESSAGE_HEADER);
    for change in delta {
        message.push('\n');
        message.push_str(&describe(change));
    }
    message
}
