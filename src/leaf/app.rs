use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::errors::{Error, Result};
use crate::note::{self, new_note_id, Note, NotePatch};
use crate::specific_fail;
use crate::storage::{Storage, NOTES_KEY, THEME_KEY};
use crate::theme::Theme;

/// In-memory state of the note keeper: the note list (newest first), the
/// note open in the editor, and the theme. Every mutation of the list is
/// mirrored to the store before returning.
pub struct App<S: Storage> {
    storage: S,
    notes: Vec<Note>,
    current: Option<String>,
    theme: Theme,
}

/// figures shown by `leaf info`
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    pub notes: usize,
    pub with_summary: usize,
    pub oldest: Option<DateTime<Utc>>,
    pub newest: Option<DateTime<Utc>>,
    pub theme: Theme,
}

impl<S: Storage> App<S> {
    /// read the note list and theme out of the store
    pub fn load(storage: S) -> Result<App<S>> {
        let notes: Vec<Note> = match storage.get_item(NOTES_KEY)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(n) => n,
                Err(e) => {
                    let err = Error::from(format!("stored notes are malformed: {}", e));
                    return Err(err.with_detail(storage.describe(NOTES_KEY)));
                }
            },
            None => vec![],
        };
        let theme = Theme::from_stored(storage.get_item(THEME_KEY)?.as_deref());
        info!("event=store_loaded notes={} theme={}", notes.len(), theme);
        Ok(App {
            storage,
            notes,
            current: None,
            theme,
        })
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// the note open in the editor, if the pointer still resolves
    pub fn current_note(&self) -> Option<&Note> {
        let id = self.current.as_ref()?;
        self.notes.iter().find(|n| &n.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Look a note up by exact id, falling back to its 1-based position in
    /// the list.
    pub fn resolve(&self, reference: &str) -> Option<&Note> {
        let reference = reference.trim();
        if let Some(n) = self.get(reference) {
            return Some(n);
        }
        match reference.parse::<usize>() {
            Ok(pos) if pos >= 1 => self.notes.get(pos - 1),
            _ => None,
        }
    }

    /// add a blank note at the top of the list and open it
    pub fn create_note(&mut self) -> Result<String> {
        self.create_note_at(note::now())
    }

    fn create_note_at(&mut self, now: DateTime<Utc>) -> Result<String> {
        let id = new_note_id(now, &self.notes);
        self.notes.insert(0, Note::new(id.clone(), now));
        self.current = Some(id.clone());
        info!("event=note_created id={}", id);
        self.persist()?;
        Ok(id)
    }

    pub fn update_note(&mut self, id: &str, patch: NotePatch) -> Result<()> {
        self.update_note_at(id, patch, note::now())
    }

    fn update_note_at(&mut self, id: &str, patch: NotePatch, now: DateTime<Utc>) -> Result<()> {
        let note = match self.notes.iter_mut().find(|n| n.id == id) {
            Some(n) => n,
            None => return specific_fail!(format!("note {} doesn't exist", id)),
        };
        note.apply(patch, now);
        info!("event=note_updated id={}", id);
        self.persist()
    }

    /// Remove a note, closing the editor if it was open on it. Returns
    /// `false` when no note had that id.
    pub fn delete_note(&mut self, id: &str) -> Result<bool> {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        if self.current.as_deref() == Some(id) {
            self.current = None;
        }
        if self.notes.len() == before {
            debug!("event=note_delete_miss id={}", id);
            return Ok(false);
        }
        info!("event=note_deleted id={}", id);
        self.persist()?;
        Ok(true)
    }

    /// remove every note
    pub fn clear(&mut self) -> Result<usize> {
        let removed = self.notes.len();
        self.notes.clear();
        self.current = None;
        info!("event=notes_cleared count={}", removed);
        self.persist()?;
        Ok(removed)
    }

    pub fn select(&mut self, id: &str) -> Result<()> {
        if self.get(id).is_none() {
            return specific_fail!(format!("note {} doesn't exist", id));
        }
        self.current = Some(id.to_string());
        Ok(())
    }

    pub fn close(&mut self) {
        self.current = None;
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let next = self.theme.toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.theme = theme;
        self.storage.set_item(THEME_KEY, &theme.to_string())?;
        info!("event=theme_changed theme={}", theme);
        Ok(())
    }

    pub fn stats(&self) -> Stats {
        Stats {
            notes: self.notes.len(),
            with_summary: self.notes.iter().filter(|n| n.summary.is_some()).count(),
            oldest: self.notes.iter().map(|n| n.created_at).min(),
            newest: self.notes.iter().map(|n| n.updated_at).max(),
            theme: self.theme,
        }
    }

    /// mirror the note list to the store
    fn persist(&mut self) -> Result<()> {
        let encoded = serde_json::to_string(&self.notes)?;
        self.storage.set_item(NOTES_KEY, &encoded)?;
        debug!("event=notes_saved count={}", self.notes.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn empty_app() -> App<MemoryStorage> {
        App::load(MemoryStorage::new()).unwrap()
    }

    fn stored_notes(app: &App<MemoryStorage>) -> Vec<Note> {
        let raw = app.storage().get_item(NOTES_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn empty_store_loads_empty_light() {
        let app = empty_app();
        assert!(app.notes().is_empty());
        assert_eq!(app.theme(), Theme::Light);
        assert!(app.current_note().is_none());
    }

    #[test]
    fn create_prepends_opens_and_persists() {
        let mut app = empty_app();
        let first = app.create_note_at(at(1_000)).unwrap();
        let second = app.create_note_at(at(2_000)).unwrap();
        let ids: Vec<&str> = app.notes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec![second.as_str(), first.as_str()]);
        assert_eq!(app.current_id(), Some(second.as_str()));
        assert_eq!(stored_notes(&app), app.notes().to_vec());
    }

    #[test]
    fn ids_stay_unique_within_one_millisecond() {
        let mut app = empty_app();
        let a = app.create_note_at(at(7_000)).unwrap();
        let b = app.create_note_at(at(7_000)).unwrap();
        assert_eq!(a, "7000");
        assert_eq!(b, "7001");
    }

    #[test]
    fn update_refreshes_timestamp_and_persists() {
        let mut app = empty_app();
        let id = app.create_note_at(at(1_000)).unwrap();
        let patch = NotePatch {
            title: Some("Shopping".to_string()),
            content: Some("eggs".to_string()),
            ..Default::default()
        };
        app.update_note_at(&id, patch, at(9_000)).unwrap();
        let n = app.get(&id).unwrap();
        assert_eq!(n.title, "Shopping");
        assert_eq!(n.content, "eggs");
        assert_eq!(n.created_at, at(1_000));
        assert_eq!(n.updated_at, at(9_000));
        assert_eq!(stored_notes(&app)[0].title, "Shopping");
    }

    #[test]
    fn update_unknown_note_fails() {
        let mut app = empty_app();
        let err = app.update_note("nope", NotePatch::default()).unwrap_err();
        assert_eq!(err.desc, "note nope doesn't exist");
    }

    #[test]
    fn deleting_current_note_closes_editor() {
        let mut app = empty_app();
        let keep = app.create_note_at(at(1_000)).unwrap();
        let doomed = app.create_note_at(at(2_000)).unwrap();
        assert!(app.delete_note(&doomed).unwrap());
        assert!(app.current_note().is_none());
        assert_eq!(stored_notes(&app).len(), 1);

        app.select(&keep).unwrap();
        assert!(!app.delete_note(&doomed).unwrap());
        assert_eq!(app.current_id(), Some(keep.as_str()));
    }

    #[test]
    fn deleting_other_note_keeps_editor_open() {
        let mut app = empty_app();
        let other = app.create_note_at(at(1_000)).unwrap();
        let open = app.create_note_at(at(2_000)).unwrap();
        assert!(app.delete_note(&other).unwrap());
        assert_eq!(app.current_id(), Some(open.as_str()));
    }

    #[test]
    fn save_then_load_yields_same_notes() {
        let mut app = empty_app();
        let id = app.create_note().unwrap();
        app.update_note(&id, NotePatch {
            summary: Some(Some("gist".to_string())),
            ..Default::default()
        }).unwrap();
        app.create_note().unwrap();
        let expected = app.notes().to_vec();

        let reloaded = App::load(app.storage().clone()).unwrap();
        assert_eq!(reloaded.notes(), &expected[..]);
        assert!(reloaded.current_note().is_none());
    }

    #[test]
    fn malformed_notes_are_reported() {
        let mut store = MemoryStorage::new();
        store.set_item(NOTES_KEY, "{not json").unwrap();
        let err = match App::load(store) {
            Ok(_) => panic!("load should fail"),
            Err(e) => e,
        };
        assert!(err.desc.starts_with("stored notes are malformed"));
        assert_eq!(err.detail.as_deref(), Some("notes"));
    }

    #[test]
    fn theme_toggle_persists_literal() {
        let mut store = MemoryStorage::new();
        store.set_item(THEME_KEY, "dark").unwrap();
        let mut app = App::load(store).unwrap();
        assert_eq!(app.theme(), Theme::Dark);
        assert_eq!(app.toggle_theme().unwrap(), Theme::Light);
        assert_eq!(app.storage().get_item(THEME_KEY).unwrap().as_deref(), Some("light"));
        assert_eq!(app.toggle_theme().unwrap(), Theme::Dark);
        assert_eq!(app.storage().get_item(THEME_KEY).unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn resolve_by_id_or_position() {
        let mut app = empty_app();
        let older = app.create_note_at(at(1_000)).unwrap();
        let newer = app.create_note_at(at(2_000)).unwrap();
        assert_eq!(app.resolve(&older).map(|n| n.id.clone()), Some(older.clone()));
        assert_eq!(app.resolve("1").map(|n| n.id.clone()), Some(newer));
        assert_eq!(app.resolve("2").map(|n| n.id.clone()), Some(older));
        assert!(app.resolve("0").is_none());
        assert!(app.resolve("3").is_none());
        assert!(app.resolve("abc").is_none());
    }

    #[test]
    fn select_unknown_note_fails() {
        let mut app = empty_app();
        assert!(app.select("123").is_err());
        assert!(app.current_id().is_none());
    }

    #[test]
    fn clear_empties_and_closes() {
        let mut app = empty_app();
        app.create_note_at(at(1_000)).unwrap();
        app.create_note_at(at(2_000)).unwrap();
        assert_eq!(app.clear().unwrap(), 2);
        assert!(app.notes().is_empty());
        assert!(app.current_note().is_none());
        assert!(stored_notes(&app).is_empty());
    }

    #[test]
    fn stats_cover_ages_and_theme() {
        let mut app = empty_app();
        let id = app.create_note_at(at(1_000)).unwrap();
        app.create_note_at(at(2_000)).unwrap();
        app.update_note_at(&id, NotePatch::default(), at(5_000)).unwrap();
        let stats = app.stats();
        assert_eq!(stats.notes, 2);
        assert_eq!(stats.with_summary, 0);
        assert_eq!(stats.oldest, Some(at(1_000)));
        assert_eq!(stats.newest, Some(at(5_000)));
        assert_eq!(stats.theme, Theme::Light);
    }
}
