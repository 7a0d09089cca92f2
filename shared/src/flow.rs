//! Session and view-stage state for the main page, kept behind controlled
//! mutation methods so the flow rules hold no matter which UI entry point
//! fires.

/// Which section of the main page is showing.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Stage {
    /// No photo yet: upload/camera tabs are visible.
    #[default]
    ChoosePhoto,
    /// Photo confirmed: gallery and action buttons are visible.
    Ready,
    /// A batch job is running: progress section is visible.
    Batch,
    /// A single try-on finished: original/result comparison is visible.
    SingleResult { result_filename: String },
}

/// Why a try-on request was refused without calling the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowDenial {
    NoSession,
    NoSelection,
}

#[derive(Clone, Debug, Default)]
pub struct SessionFlow {
    session_id: Option<String>,
    selected_item: Option<String>,
    stage: Stage,
}

impl SessionFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn selected_item(&self) -> Option<&str> {
        self.selected_item.as_deref()
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn has_session(&self) -> bool {
        self.session_id.is_some()
    }

    /// A successful upload confirmed the photo and established a session.
    pub fn confirm_photo(&mut self, session_id: String) {
        self.session_id = Some(session_id);
        self.stage = Stage::Ready;
    }

    /// "Change image" / "start over": back to square one.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Mark one item selected, deselecting any previous one.
    pub fn select_item(&mut self, filename: String) {
        self.selected_item = Some(filename);
    }

    pub fn clear_selection(&mut self) {
        self.selected_item = None;
    }

    /// Gate for a single try-on. `explicit` is the item of a per-card
    /// button, which also becomes the selection; the shared action button
    /// passes `None` and relies on the current selection.
    pub fn request_try_on(&mut self, explicit: Option<String>) -> Result<(String, String), FlowDenial> {
        let session = self.session_id.clone().ok_or(FlowDenial::NoSession)?;
        if let Some(item) = explicit {
            self.selected_item = Some(item);
        }
        let item = self.selected_item.clone().ok_or(FlowDenial::NoSelection)?;
        Ok((session, item))
    }

    /// Gate for starting a batch job.
    pub fn request_batch(&self) -> Result<String, FlowDenial> {
        self.session_id.clone().ok_or(FlowDenial::NoSession)
    }

    pub fn enter_batch(&mut self) {
        self.stage = Stage::Batch;
    }

    /// Cancelling a batch restores the pre-batch view.
    pub fn leave_batch(&mut self) {
        self.stage = Stage::Ready;
    }

    /// A completed single try-on shows its result and clears the selection.
    pub fn show_single_result(&mut self, result_filename: String) {
        self.selected_item = None;
        self.stage = Stage::SingleResult { result_filename };
    }

    /// "Try another item": back to the gallery with nothing selected.
    pub fn back_to_gallery(&mut self) {
        self.selected_item = None;
        self.stage = Stage::Ready;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_without_session_or_selection() {
        let flow = SessionFlow::new();
        assert!(!flow.has_session());
        assert_eq!(flow.selected_item(), None);
        assert_eq!(*flow.stage(), Stage::ChoosePhoto);
    }

    #[test]
    fn selecting_replaces_the_previous_item() {
        let mut flow = SessionFlow::new();
        flow.select_item("1.jpg".into());
        flow.select_item("3.jpg".into());
        assert_eq!(flow.selected_item(), Some("3.jpg"));
    }

    #[test]
    fn try_on_is_refused_without_a_session() {
        let mut flow = SessionFlow::new();
        flow.select_item("3.jpg".into());
        assert_eq!(flow.request_try_on(None), Err(FlowDenial::NoSession));
        assert_eq!(flow.request_batch(), Err(FlowDenial::NoSession));
    }

    #[test]
    fn try_on_is_refused_without_a_selection() {
        let mut flow = SessionFlow::new();
        flow.confirm_photo("sess-1".into());
        assert_eq!(flow.request_try_on(None), Err(FlowDenial::NoSelection));
    }

    #[test]
    fn per_card_button_selects_and_proceeds() {
        let mut flow = SessionFlow::new();
        flow.confirm_photo("sess-1".into());
        let (session, item) = flow.request_try_on(Some("3.jpg".into())).unwrap();
        assert_eq!(session, "sess-1");
        assert_eq!(item, "3.jpg");
        assert_eq!(flow.selected_item(), Some("3.jpg"));
    }

    #[test]
    fn completed_single_try_on_clears_the_selection() {
        let mut flow = SessionFlow::new();
        flow.confirm_photo("sess-1".into());
        flow.select_item("3.jpg".into());
        flow.show_single_result("sess-1_3_result.jpg".into());
        assert_eq!(flow.selected_item(), None);
        assert_eq!(
            *flow.stage(),
            Stage::SingleResult {
                result_filename: "sess-1_3_result.jpg".into()
            }
        );
    }

    #[test]
    fn reset_discards_session_selection_and_stage() {
        let mut flow = SessionFlow::new();
        flow.confirm_photo("sess-1".into());
        flow.select_item("2.jpg".into());
        flow.enter_batch();
        flow.reset();
        assert!(!flow.has_session());
        assert_eq!(flow.selected_item(), None);
        assert_eq!(*flow.stage(), Stage::ChoosePhoto);
    }

    #[test]
    fn cancelling_a_batch_restores_the_gallery_stage() {
        let mut flow = SessionFlow::new();
        flow.confirm_photo("sess-1".into());
        flow.enter_batch();
        assert_eq!(*flow.stage(), Stage::Batch);
        flow.leave_batch();
        assert_eq!(*flow.stage(), Stage::Ready);
        assert!(flow.has_session());
    }
}
