//! Template slot allocation.
//!
//! At most [`MAX_TEMPLATES`] entries are flagged as templates at once, each
//! holding a distinct slot in `0..MAX_TEMPLATES`. Slots are handed out
//! smallest-free-first, so freeing slot 2 and marking another entry reuses 2.
//! This module is the only writer of an entry's template fields.
//!
//! The display list merges custom templates (by slot) with the built-in
//! catalog, custom first, capped at [`MAX_TEMPLATES`] rows.

use super::draft::Draft;
use super::store::EntryStore;
use super::types::{Entry, TemplateSource, TemplateView, BUILTIN_TEMPLATES, MAX_TEMPLATES};
use crate::error::{JournalError, JournalResult};

const CUSTOM_TEMPLATE_ICON: &str = "📝";

/// Number of entries currently flagged as templates.
pub fn template_count(entries: &[Entry]) -> usize {
    entries.iter().filter(|e| e.is_template()).count()
}

/// True iff another entry may still be marked as a template.
pub fn can_add_more(entries: &[Entry]) -> bool {
    template_count(entries) < MAX_TEMPLATES
}

/// Lowest slot not held by any template entry.
///
/// Callers check capacity first, so running out of slots here means the
/// uniqueness invariant was already broken.
fn smallest_free_slot(entries: &[Entry]) -> JournalResult<usize> {
    let mut used = [false; MAX_TEMPLATES];
    for order in entries.iter().filter_map(|e| e.template_order()) {
        if order < MAX_TEMPLATES {
            used[order] = true;
        }
    }
    used.iter().position(|taken| !taken).ok_or_else(|| {
        JournalError::SlotInvariant(format!(
            "no free slot among {MAX_TEMPLATES} with {} templates flagged",
            template_count(entries)
        ))
    })
}

/// Custom templates ordered by slot, then built-ins in catalog order, capped
/// at [`MAX_TEMPLATES`] rows in total.
pub fn available_templates(entries: &[Entry]) -> Vec<TemplateView> {
    let mut custom: Vec<&Entry> = entries.iter().filter(|e| e.is_template()).collect();
    custom.sort_by_key(|e| e.template_order());

    let builtin_room = MAX_TEMPLATES.saturating_sub(custom.len());

    let custom_views = custom.into_iter().take(MAX_TEMPLATES).map(|e| TemplateView {
        id: e.id().to_string(),
        name: e.display_name(),
        icon: CUSTOM_TEMPLATE_ICON.to_string(),
        source: TemplateSource::Custom {
            order: e.template_order().unwrap_or_default(),
        },
    });

    let builtin_views = BUILTIN_TEMPLATES.iter().take(builtin_room).map(|t| TemplateView {
        id: t.id.to_string(),
        name: t.name.to_string(),
        icon: t.icon.to_string(),
        source: TemplateSource::Builtin,
    });

    custom_views.chain(builtin_views).collect()
}

/// Stage a template's text as unsaved input.
///
/// Built-ins are searched first, then custom template entries. Nothing is
/// persisted: the returned draft has no id and stays template-origin until
/// the user edits it.
pub fn create_entry_from_template(entries: &[Entry], template_id: &str) -> JournalResult<Draft> {
    if let Some(builtin) = BUILTIN_TEMPLATES.iter().find(|t| t.id == template_id) {
        return Ok(Draft::from_template(builtin.content));
    }

    entries
        .iter()
        .find(|e| e.is_template() && e.id() == template_id)
        .map(|e| Draft::from_template(e.content()))
        .ok_or_else(|| JournalError::TemplateNotFound(template_id.to_string()))
}

/// Mutating side of the allocator, borrowing the store it works on.
pub struct TemplateSlotAllocator<'a> {
    store: &'a mut EntryStore,
}

impl<'a> TemplateSlotAllocator<'a> {
    pub fn new(store: &'a mut EntryStore) -> Self {
        Self { store }
    }

    pub fn can_add_more(&self) -> bool {
        can_add_more(self.store.entries())
    }

    pub fn available_templates(&self) -> Vec<TemplateView> {
        available_templates(self.store.entries())
    }

    /// Flag an entry as a template in the smallest free slot and persist.
    ///
    /// Marking an entry that already is a template returns its current slot
    /// without touching anything.
    pub fn mark_as_template(&mut self, entry_id: &str) -> JournalResult<usize> {
        let existing = self
            .store
            .get(entry_id)
            .ok_or_else(|| JournalError::EntryNotFound(entry_id.to_string()))?
            .template_order();
        if let Some(order) = existing {
            return Ok(order);
        }

        if !self.can_add_more() {
            tracing::warn!(entry_id, max = MAX_TEMPLATES, "template slots full");
            return Err(JournalError::TemplateCapacity { max: MAX_TEMPLATES });
        }

        let slot = smallest_free_slot(self.store.entries())?;
        self.assign(entry_id, Some(slot))?;
        tracing::info!(entry_id, slot, "entry marked as template");
        Ok(slot)
    }

    /// Clear an entry's template flag, freeing its slot, and persist.
    pub fn unmark_as_template(&mut self, entry_id: &str) -> JournalResult<()> {
        let existing = self
            .store
            .get(entry_id)
            .ok_or_else(|| JournalError::EntryNotFound(entry_id.to_string()))?
            .template_order();
        let Some(slot) = existing else {
            return Ok(());
        };

        self.assign(entry_id, None)?;
        tracing::info!(entry_id, slot, "template slot freed");
        Ok(())
    }

    /// Write the slot and commit; restore the previous slot if the write fails.
    fn assign(&mut self, entry_id: &str, slot: Option<usize>) -> JournalResult<()> {
        let entry = self
            .store
            .get_mut(entry_id)
            .ok_or_else(|| JournalError::EntryNotFound(entry_id.to_string()))?;
        let previous = entry.template_order();
        entry.set_template_slot(slot);

        if let Err(e) = self.store.commit() {
            if let Some(entry) = self.store.get_mut(entry_id) {
                entry.set_template_slot(previous);
            }
            return Err(e);
        }
        Ok(())
    }
}

/// Clear slots that collide with an earlier holder or fall out of range.
/// Returns how many entries were demoted.
pub(crate) fn normalize_slots(entries: &mut [Entry]) -> usize {
    let mut used = [false; MAX_TEMPLATES];
    let mut repaired = 0;
    for entry in entries.iter_mut() {
        let Some(order) = entry.template_order() else {
            continue;
        };
        if order >= MAX_TEMPLATES || used[order] {
            entry.set_template_slot(None);
            repaired += 1;
        } else {
            used[order] = true;
        }
    }
    repaired
}

/// Remove and return an incoming entry's slot claim before it joins the store.
pub(crate) fn take_slot_claim(entry: &mut Entry) -> Option<usize> {
    let claim = entry.template_order();
    entry.set_template_slot(None);
    claim
}

/// Counts from [`reseat_claims`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReseatReport {
    pub reseated: usize,
    pub demoted: usize,
}

/// Give merged-in entries that used to be templates a fresh slot, in the
/// order of their old slots. Entries that no longer fit stay ordinary.
/// Does not commit; the caller persists once after merging.
pub(crate) fn reseat_claims(
    entries: &mut [Entry],
    mut claims: Vec<(String, usize)>,
) -> JournalResult<ReseatReport> {
    claims.sort_by_key(|(_, order)| *order);
    let mut report = ReseatReport::default();

    for (id, _) in claims {
        if !can_add_more(entries) {
            report.demoted += 1;
            continue;
        }
        let slot = smallest_free_slot(entries)?;
        match entries.iter_mut().find(|e| e.id() == id) {
            Some(entry) => {
                entry.set_template_slot(Some(slot));
                report.reseated += 1;
            }
            None => report.demoted += 1,
        }
    }
    Ok(report)
}
