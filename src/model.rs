use tracing::{debug, error, info, trace};

use crate::domain::{AtvError, Message};
use crate::loader::{FetchOutcome, LoadStatus, FETCH_ERROR_MESSAGE};
use crate::pipeline::{self, QueryState};
use crate::records::{Application, SortDirection, SortKey, COLUMNS};
use crate::search_input::SearchInput;

#[derive(Debug, PartialEq)]
pub enum Status {
    Running,
    Quitting,
}

/// Render snapshot handed to the UI. Rebuilt after every state transition.
#[derive(Debug, Clone, Default)]
pub struct UiData {
    pub load_status: LoadStatus,
    pub search: String,
    pub search_cursor: usize,
    pub search_active: bool,
    /// Visible page, one display string per column of `COLUMNS`.
    pub rows: Vec<Vec<String>>,
    pub current_page: usize,
    pub total_pages: usize,
    pub filtered_count: usize,
    pub total_count: usize,
    pub sort: Option<(SortKey, SortDirection)>,
    pub status_message: String,
}

pub struct Model {
    pub status: Status,
    records: Vec<Application>,
    load_status: LoadStatus,
    query: QueryState,
    search: SearchInput,
    status_message: String,
    uidata: UiData,
}

impl Model {
    pub fn new() -> Self {
        let mut model = Self {
            status: Status::Running,
            records: Vec::new(),
            load_status: LoadStatus::Loading,
            query: QueryState::default(),
            search: SearchInput::default(),
            status_message: "Loading ...".to_string(),
            uidata: UiData::default(),
        };
        model.rebuild_uidata();
        model
    }

    /// While the search box has focus, keys are delivered raw.
    pub fn raw_keyevents(&self) -> bool {
        self.search.is_active()
    }

    pub fn get_uidata(&self) -> &UiData {
        &self.uidata
    }

    pub fn update(&mut self, message: Message) -> Result<(), AtvError> {
        trace!("Update: {message:?}");
        match message {
            Message::Quit => self.status = Status::Quitting,
            Message::LoadFinished(outcome) => self.finish_load(outcome),
            Message::ToggleSort(key) => self.toggle_sort(key),
            Message::GotoPage(page) => self.query.page = page.max(1),
            Message::NextPage => self.query.page += 1,
            Message::PrevPage => self.query.page = (self.query.page - 1).max(1),
            Message::OpenSearch => self.search.activate(),
            Message::RawKey(key) => {
                if self.search.is_active() {
                    self.search.read(key);
                    // Live filtering: the query tracks every keystroke. The
                    // page is deliberately left untouched; a narrowed result
                    // set can leave the user on an empty page.
                    self.query.search = self.search.text().to_string();
                }
            }
            Message::Resize(width, height) => {
                trace!("UI was resized to {width}x{height}");
            }
        }
        self.rebuild_uidata();
        Ok(())
    }

    /// Loading resolves exactly once; a second completion is discarded.
    fn finish_load(&mut self, outcome: FetchOutcome) {
        if self.load_status != LoadStatus::Loading {
            debug!("Ignoring load completion after terminal load state");
            return;
        }
        match outcome {
            Ok(records) => {
                info!("Loaded {} application records", records.len());
                self.status_message = format!("Loaded {} records", records.len());
                self.records = records;
                self.load_status = LoadStatus::Loaded;
            }
            Err(e) => {
                error!("Load failed: {e}");
                self.status_message = FETCH_ERROR_MESSAGE.to_string();
                self.load_status = LoadStatus::Failed(FETCH_ERROR_MESSAGE.to_string());
            }
        }
    }

    /// Same key toggles the direction; a new key starts ascending.
    fn toggle_sort(&mut self, key: SortKey) {
        if self.query.sort_key == Some(key) {
            self.query.sort_direction = match self.query.sort_direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
            };
        } else {
            self.query.sort_key = Some(key);
            self.query.sort_direction = SortDirection::Ascending;
        }
    }

    fn rebuild_uidata(&mut self) {
        let out = pipeline::run(&self.records, &self.query);
        let rows = out
            .rows
            .iter()
            .map(|&idx| {
                let app = &self.records[idx];
                COLUMNS.iter().map(|&c| app.cell(c)).collect()
            })
            .collect();

        self.uidata = UiData {
            load_status: self.load_status.clone(),
            search: self.query.search.clone(),
            search_cursor: self.search.cursor(),
            search_active: self.search.is_active(),
            rows,
            current_page: self.query.page,
            total_pages: out.total_pages,
            filtered_count: out.filtered_count,
            total_count: self.records.len(),
            sort: self.query.sort_key.map(|k| (k, self.query.sort_direction)),
            status_message: self.status_message.clone(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::FetchError;
    use ratatui::crossterm::event::KeyCode;

    fn app(name: &str, status: &str, student: &str) -> Application {
        Application {
            applicant_name: Some(name.to_string()),
            status_english: Some(status.to_string()),
            student_id: Some(student.to_string()),
            ..Default::default()
        }
    }

    fn loaded_model(records: Vec<Application>) -> Model {
        let mut model = Model::new();
        model.update(Message::LoadFinished(Ok(records))).unwrap();
        model
    }

    fn type_query(model: &mut Model, text: &str) {
        model.update(Message::OpenSearch).unwrap();
        for c in text.chars() {
            model
                .update(Message::RawKey(KeyCode::Char(c).into()))
                .unwrap();
        }
        model.update(Message::RawKey(KeyCode::Enter.into())).unwrap();
    }

    #[test]
    fn starts_loading_with_no_rows() {
        let model = Model::new();
        assert_eq!(model.get_uidata().load_status, LoadStatus::Loading);
        assert!(model.get_uidata().rows.is_empty());
    }

    #[test]
    fn successful_load_populates_the_first_page() {
        let records: Vec<_> = (0..25)
            .map(|i| app(&format!("Name {i:02}"), "Pending", &format!("S-{i}")))
            .collect();
        let model = loaded_model(records);
        let ui = model.get_uidata();
        assert_eq!(ui.load_status, LoadStatus::Loaded);
        assert_eq!(ui.rows.len(), 10);
        assert_eq!(ui.total_pages, 3);
        assert_eq!(ui.total_count, 25);
    }

    #[test]
    fn failed_load_shows_generic_message_and_no_rows() {
        let mut model = Model::new();
        model
            .update(Message::LoadFinished(Err(FetchError::Status(
                reqwest::StatusCode::NOT_FOUND,
            ))))
            .unwrap();
        let ui = model.get_uidata();
        assert_eq!(
            ui.load_status,
            LoadStatus::Failed("Error fetching applications.".to_string())
        );
        assert!(ui.rows.is_empty());
    }

    #[test]
    fn load_resolves_exactly_once() {
        let mut model = loaded_model(vec![app("Omar", "Pending", "S-1")]);
        model
            .update(Message::LoadFinished(Err(FetchError::Status(
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            ))))
            .unwrap();
        assert_eq!(model.get_uidata().load_status, LoadStatus::Loaded);
        assert_eq!(model.get_uidata().rows.len(), 1);
    }

    #[test]
    fn sort_header_toggles_direction_and_reverses_rows() {
        let mut model = loaded_model(vec![
            app("Omar", "", ""),
            app("Aisha", "", ""),
            app("Lina", "", ""),
        ]);
        model
            .update(Message::ToggleSort(SortKey::ApplicantName))
            .unwrap();
        let ascending: Vec<_> = model
            .get_uidata()
            .rows
            .iter()
            .map(|r| r[1].clone())
            .collect();
        assert_eq!(ascending, vec!["Aisha", "Lina", "Omar"]);
        assert_eq!(
            model.get_uidata().sort,
            Some((SortKey::ApplicantName, SortDirection::Ascending))
        );

        model
            .update(Message::ToggleSort(SortKey::ApplicantName))
            .unwrap();
        let descending: Vec<_> = model
            .get_uidata()
            .rows
            .iter()
            .map(|r| r[1].clone())
            .collect();
        let mut reversed = ascending.clone();
        reversed.reverse();
        assert_eq!(descending, reversed);
    }

    #[test]
    fn switching_sort_key_resets_to_ascending() {
        let mut model = loaded_model(vec![app("Omar", "", "")]);
        model
            .update(Message::ToggleSort(SortKey::ApplicantName))
            .unwrap();
        model
            .update(Message::ToggleSort(SortKey::ApplicantName))
            .unwrap();
        model
            .update(Message::ToggleSort(SortKey::ApplicationDate))
            .unwrap();
        assert_eq!(
            model.get_uidata().sort,
            Some((SortKey::ApplicationDate, SortDirection::Ascending))
        );
    }

    #[test]
    fn searching_filters_live_per_keystroke() {
        let mut model = loaded_model(vec![
            app("Aisha", "Approved", "S-1"),
            app("Aiden", "Pending", "S-2"),
            app("Omar", "Pending", "S-3"),
        ]);
        model.update(Message::OpenSearch).unwrap();
        model
            .update(Message::RawKey(KeyCode::Char('a').into()))
            .unwrap();
        // "a" matches Aisha, Aiden and Omar (via "Omar")
        assert_eq!(model.get_uidata().filtered_count, 3);
        model
            .update(Message::RawKey(KeyCode::Char('i').into()))
            .unwrap();
        assert_eq!(model.get_uidata().filtered_count, 2);
    }

    #[test]
    fn narrowing_the_search_keeps_the_stale_page() {
        let records: Vec<_> = (0..25)
            .map(|i| app(&format!("Name {i:02}"), "Pending", &format!("S-{i}")))
            .collect();
        let mut model = loaded_model(records);
        model.update(Message::GotoPage(3)).unwrap();
        assert_eq!(model.get_uidata().rows.len(), 5);

        type_query(&mut model, "name 01");
        let ui = model.get_uidata();
        // The page is not reset, so the single match is out of view.
        assert_eq!(ui.current_page, 3);
        assert_eq!(ui.filtered_count, 1);
        assert_eq!(ui.total_pages, 1);
        assert!(ui.rows.is_empty());
    }

    #[test]
    fn unmatched_search_yields_the_no_records_state() {
        let mut model = loaded_model(vec![app("Omar", "Pending", "S-1")]);
        type_query(&mut model, "zzz");
        let ui = model.get_uidata();
        assert_eq!(ui.load_status, LoadStatus::Loaded);
        assert_eq!(ui.filtered_count, 0);
        assert!(ui.rows.is_empty());
    }

    #[test]
    fn page_navigation_saturates_at_one_but_not_above() {
        let mut model = loaded_model(vec![app("Omar", "Pending", "S-1")]);
        model.update(Message::PrevPage).unwrap();
        assert_eq!(model.get_uidata().current_page, 1);
        model.update(Message::GotoPage(5)).unwrap();
        let ui = model.get_uidata();
        assert_eq!(ui.current_page, 5);
        assert_eq!(ui.total_pages, 1);
        assert!(ui.rows.is_empty());
    }

    #[test]
    fn quit_message_stops_the_loop() {
        let mut model = Model::new();
        model.update(Message::Quit).unwrap();
        assert_eq!(model.status, Status::Quitting);
    }
}
