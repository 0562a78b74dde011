//! Navigation stack and presented-form tracking

use super::forms::{AssociationsViewModel, FormViewModel};
use super::options::ValidationErrorVisibility;
use crate::engine::{AssociationFilterResult, AssociationGroupResult, FeatureForm, RecordId};
use std::sync::Arc;
use tracing::{debug, info};

/// A page pushed above the root form
#[derive(Debug)]
pub enum NavigationPage {
    SubForm(FormViewModel),
    AssociationFilterResult {
        result: AssociationFilterResult,
        view_model: AssociationsViewModel,
    },
    AssociationGroupResult {
        result: AssociationGroupResult,
        view_model: AssociationsViewModel,
    },
}

impl NavigationPage {
    /// The form this page belongs to
    pub fn form(&self) -> &Arc<dyn FeatureForm> {
        match self {
            NavigationPage::SubForm(vm) => vm.form(),
            NavigationPage::AssociationFilterResult { view_model, .. }
            | NavigationPage::AssociationGroupResult { view_model, .. } => view_model.form(),
        }
    }

    pub fn is_association_result(&self) -> bool {
        !matches!(self, NavigationPage::SubForm(_))
    }

    pub fn title(&self) -> String {
        match self {
            NavigationPage::SubForm(vm) => vm.form().title(),
            NavigationPage::AssociationFilterResult { result, .. } => result.name.clone(),
            NavigationPage::AssociationGroupResult { result, .. } => result.name.clone(),
        }
    }
}

/// The page currently on screen
#[derive(Debug)]
pub enum VisiblePage<'a> {
    Root(&'a FormViewModel),
    Page(&'a NavigationPage),
}

/// Owns the navigation stack and decides which form is presented.
///
/// The root form sits below the stack; the last pushed page is visible.
/// The presented form only changes when a page for a different record
/// becomes visible, so pages that belong to the same record never reset
/// the validation-error visibility.
#[derive(Debug, Default)]
pub struct NavigationOrchestrator {
    root: Option<FormViewModel>,
    stack: Vec<NavigationPage>,
    presented_form: Option<Arc<dyn FeatureForm>>,
    validation_visibility: ValidationErrorVisibility,
    navigation_disabled: bool,
}

impl NavigationOrchestrator {
    pub fn new(navigation_disabled: bool) -> Self {
        Self {
            navigation_disabled,
            ..Self::default()
        }
    }

    /// Replace the root form, dropping every pushed page
    pub fn set_root(&mut self, form: Option<Arc<dyn FeatureForm>>) {
        self.stack.clear();
        match form {
            Some(form) => {
                self.root = Some(FormViewModel::new(Arc::clone(&form)));
                self.form_changed(form);
            }
            None => {
                self.root = None;
                self.presented_form = None;
                self.validation_visibility = ValidationErrorVisibility::Automatic;
            }
        }
    }

    pub fn root(&self) -> Option<&FormViewModel> {
        self.root.as_ref()
    }

    pub fn is_navigation_disabled(&self) -> bool {
        self.navigation_disabled
    }

    /// Pages above the root, root-to-leaf
    pub fn pages(&self) -> &[NavigationPage] {
        &self.stack
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn presented_form(&self) -> Option<&Arc<dyn FeatureForm>> {
        self.presented_form.as_ref()
    }

    pub fn presented_id(&self) -> Option<RecordId> {
        self.presented_form.as_ref().map(|f| f.global_id())
    }

    pub fn validation_visibility(&self) -> ValidationErrorVisibility {
        self.validation_visibility
    }

    pub fn set_validation_visibility(&mut self, visibility: ValidationErrorVisibility) {
        self.validation_visibility = visibility;
    }

    pub fn visible(&self) -> Option<VisiblePage<'_>> {
        match self.stack.last() {
            Some(page) => Some(VisiblePage::Page(page)),
            None => self.root.as_ref().map(VisiblePage::Root),
        }
    }

    /// Form of the visible page
    pub fn visible_form(&self) -> Option<&Arc<dyn FeatureForm>> {
        match self.stack.last() {
            Some(page) => Some(page.form()),
            None => self.root.as_ref().map(FormViewModel::form),
        }
    }

    /// Mutable view model of the visible form page, if a form is visible
    pub fn visible_form_view_mut(&mut self) -> Option<&mut FormViewModel> {
        match self.stack.last_mut() {
            Some(NavigationPage::SubForm(vm)) => Some(vm),
            Some(_) => None,
            None => self.root.as_mut(),
        }
    }

    pub fn visible_page_mut(&mut self) -> Option<&mut NavigationPage> {
        self.stack.last_mut()
    }

    /// Push a page; association pages are refused while navigation is disabled.
    ///
    /// Returns whether the page was pushed.
    pub fn push(&mut self, page: NavigationPage) -> bool {
        if self.navigation_disabled && page.is_association_result() {
            debug!("Navigation to associations is disabled; ignoring push");
            return false;
        }
        let form = Arc::clone(page.form());
        debug!(depth = self.stack.len() + 1, page = %page.title(), "Pushing page");
        self.stack.push(page);
        self.form_changed(form);
        true
    }

    /// Platform back navigation
    pub fn pop(&mut self) -> Option<NavigationPage> {
        let page = self.stack.pop()?;
        debug!(depth = self.stack.len(), page = %page.title(), "Popped page");
        if let Some(form) = self.visible_form().cloned() {
            self.form_changed(form);
        }
        Some(page)
    }

    /// Whether popping would present a different record
    pub fn pop_changes_record(&self) -> bool {
        let below = match self.stack.len() {
            0 => return false,
            1 => self.root.as_ref().map(FormViewModel::form),
            n => Some(self.stack[n - 2].form()),
        };
        below.map(|f| f.global_id()) != self.presented_id()
    }

    /// Called whenever a page becomes visible
    pub fn form_changed(&mut self, form: Arc<dyn FeatureForm>) {
        let incoming = form.global_id();
        if self.presented_id() == Some(incoming) {
            return;
        }
        info!(record = %incoming, "Presented form changed");
        self.presented_form = Some(form);
        self.validation_visibility = ValidationErrorVisibility::Automatic;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::sample_dataset;
    use crate::engine::{Association, MockFeatureForm};
    use pretty_assertions::assert_eq;

    fn mock_form(id: RecordId) -> Arc<dyn FeatureForm> {
        let mut form = MockFeatureForm::new();
        form.expect_global_id().return_const(id);
        form.expect_title().returning(|| "Record".to_string());
        form.expect_elements().returning(Vec::new);
        form.expect_association_filters().returning(Vec::new);
        Arc::new(form)
    }

    fn filter_page(form: &Arc<dyn FeatureForm>) -> NavigationPage {
        NavigationPage::AssociationFilterResult {
            result: AssociationFilterResult {
                name: "Connectivity".to_string(),
                groups: Vec::new(),
            },
            view_model: AssociationsViewModel::new(Arc::clone(form)),
        }
    }

    fn group_page(form: &Arc<dyn FeatureForm>, associations: Vec<Association>) -> NavigationPage {
        NavigationPage::AssociationGroupResult {
            result: AssociationGroupResult {
                name: "Valves".to_string(),
                associations,
            },
            view_model: AssociationsViewModel::new(Arc::clone(form)),
        }
    }

    #[test]
    fn test_set_root_presents_form() {
        let id = RecordId::new();
        let mut nav = NavigationOrchestrator::default();
        nav.set_root(Some(mock_form(id)));
        assert_eq!(nav.presented_id(), Some(id));
        assert!(matches!(nav.visible(), Some(VisiblePage::Root(_))));
    }

    #[test]
    fn test_same_record_push_keeps_presented_form_and_visibility() {
        let id = RecordId::new();
        let root = mock_form(id);
        let mut nav = NavigationOrchestrator::default();
        nav.set_root(Some(Arc::clone(&root)));
        nav.set_validation_visibility(ValidationErrorVisibility::Visible);

        // A distinct instance for the same record
        let other_instance = mock_form(id);
        assert!(nav.push(filter_page(&other_instance)));
        assert!(nav.push(group_page(&other_instance, Vec::new())));

        assert!(Arc::ptr_eq(nav.presented_form().unwrap(), &root));
        assert_eq!(
            nav.validation_visibility(),
            ValidationErrorVisibility::Visible
        );
    }

    #[test]
    fn test_different_record_push_updates_and_resets() {
        let mut nav = NavigationOrchestrator::default();
        nav.set_root(Some(mock_form(RecordId::new())));
        nav.set_validation_visibility(ValidationErrorVisibility::Visible);

        let other_id = RecordId::new();
        assert!(nav.push(NavigationPage::SubForm(FormViewModel::new(mock_form(
            other_id
        )))));

        assert_eq!(nav.presented_id(), Some(other_id));
        assert_eq!(
            nav.validation_visibility(),
            ValidationErrorVisibility::Automatic
        );
    }

    #[test]
    fn test_pop_restores_previous_record() {
        let root_id = RecordId::new();
        let mut nav = NavigationOrchestrator::default();
        nav.set_root(Some(mock_form(root_id)));
        let root = Arc::clone(nav.presented_form().unwrap());
        nav.push(filter_page(&root));
        nav.push(NavigationPage::SubForm(FormViewModel::new(mock_form(
            RecordId::new(),
        ))));
        assert_eq!(nav.depth(), 2);
        assert!(nav.pop_changes_record());

        nav.set_validation_visibility(ValidationErrorVisibility::Visible);
        assert!(nav.pop().is_some());

        assert_eq!(nav.presented_id(), Some(root_id));
        assert_eq!(
            nav.validation_visibility(),
            ValidationErrorVisibility::Automatic
        );
        assert!(!nav.pop_changes_record());
    }

    #[test]
    fn test_pop_on_root_is_none() {
        let mut nav = NavigationOrchestrator::default();
        nav.set_root(Some(mock_form(RecordId::new())));
        assert!(nav.pop().is_none());
        assert!(!nav.pop_changes_record());
    }

    #[test]
    fn test_disabled_navigation_refuses_association_pages() {
        let mut nav = NavigationOrchestrator::new(true);
        nav.set_root(Some(mock_form(RecordId::new())));
        let root = Arc::clone(nav.presented_form().unwrap());
        assert!(!nav.push(filter_page(&root)));
        assert_eq!(nav.depth(), 0);
    }

    #[test]
    fn test_set_root_clears_stack() {
        let mut nav = NavigationOrchestrator::default();
        nav.set_root(Some(mock_form(RecordId::new())));
        let root = Arc::clone(nav.presented_form().unwrap());
        nav.push(filter_page(&root));

        nav.set_root(None);
        assert_eq!(nav.depth(), 0);
        assert!(nav.presented_form().is_none());
        assert!(nav.visible().is_none());
    }

    #[test]
    fn test_visible_form_view_mut_skips_association_pages() {
        let dataset = sample_dataset();
        let mut nav = NavigationOrchestrator::default();
        let root: Arc<dyn FeatureForm> = dataset.first().unwrap();
        nav.set_root(Some(Arc::clone(&root)));
        assert!(nav.visible_form_view_mut().is_some());

        let filters = root.association_filters();
        nav.push(NavigationPage::AssociationFilterResult {
            result: filters[0].clone(),
            view_model: AssociationsViewModel::new(Arc::clone(&root)),
        });
        assert!(nav.visible_form_view_mut().is_none());
        assert_eq!(
            nav.visible_form().map(|f| f.global_id()),
            Some(root.global_id())
        );
    }
}
