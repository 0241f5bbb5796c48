//! State machine behind one admin table screen.
//!
//! A [`ListController`] owns the transient UI state (page, search, sort,
//! filters, open dialog, toasts) and talks to an [`ApiClient`] it borrows per
//! call. Rendering is left to whoever turns [`ListView`] into pixels.

use std::time::{Duration, Instant};

use thiserror::Error;

use crate::api::resources::{KarkunJoinRequests, Questions};
use crate::api::{ApiClient, ListParams, Page, Resource};
use crate::controller::debounce::{DEFAULT_DEBOUNCE, Debounced};
use crate::controller::notify::Notification;
use crate::controller::sort::{SortState, Sortable, sort_rows, toggle};
use crate::domain::types::{KarkunJoinRequestId, QuestionId};
use crate::dto::list::ListView;
use crate::forms::khat::AnswerForm;
use crate::forms::{Editable, FormError};
use crate::pagination::{PageSize, PageSummary, page_window};
use crate::permissions::{Action, Capabilities, PermissionDenied, can, ensure};
use crate::transport::{ApiError, ApiRequest, ApiResult, Transport};

pub mod columns;
pub mod debounce;
pub mod notify;
pub mod sort;

/// Sortable column type of resource `R`.
pub type ColumnOf<R> = <<R as Resource>::Entity as Sortable>::Column;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControllerError {
    #[error(transparent)]
    Forbidden(#[from] PermissionDenied),

    #[error("a submission is already in progress")]
    Busy,

    #[error("no form is open")]
    NoDraft,

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

pub type ControllerResult<T> = Result<T, ControllerError>;

/// Dialog currently shown over the table.
#[derive(Clone, Debug, PartialEq)]
pub enum Modal<Id, Form, Entity> {
    Closed,
    Create(Form),
    Edit { id: Id, form: Form },
    ConfirmDelete(Entity),
}

impl<Id, Form, Entity> Default for Modal<Id, Form, Entity> {
    fn default() -> Self {
        Modal::Closed
    }
}

impl<Id, Form, Entity> Modal<Id, Form, Entity> {
    pub fn is_open(&self) -> bool {
        !matches!(self, Modal::Closed)
    }
}

pub type ModalFor<R> = Modal<<R as Resource>::Id, <R as Editable>::Form, <R as Resource>::Entity>;

/// Write produced by [`ListController::prepare_submit`].
pub enum Mutation<R: Resource> {
    Create(R::Payload),
    Update(R::Id, R::Payload),
}

impl<R: Resource> Mutation<R> {
    pub fn execute<T: Transport>(&self, client: &mut ApiClient<T>) -> ApiResult<Option<R::Entity>> {
        match self {
            Mutation::Create(payload) => client.create::<R>(payload),
            Mutation::Update(id, payload) => client.update::<R>(*id, payload),
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            Mutation::Create(_) => "created",
            Mutation::Update(..) => "updated",
        }
    }
}

pub struct ListController<R>
where
    R: Editable,
    R::Entity: Sortable,
{
    page: u32,
    page_size: PageSize,
    search: Debounced<String>,
    sort: Option<SortState<ColumnOf<R>>>,
    filter: R::Filter,
    selected: Option<R::Entity>,
    modal: ModalFor<R>,
    capabilities: Capabilities,
    notifications: Vec<Notification>,
    form_errors: Vec<(String, String)>,
    is_submitting: bool,
    is_loading: bool,
    current: Page<R::Entity>,
    active: Option<ApiRequest>,
}

impl<R> ListController<R>
where
    R: Editable,
    R::Entity: Sortable,
{
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            page: 1,
            page_size: PageSize::default(),
            search: Debounced::new(String::new(), DEFAULT_DEBOUNCE),
            sort: None,
            filter: R::Filter::default(),
            selected: None,
            modal: Modal::Closed,
            capabilities,
            notifications: Vec::new(),
            form_errors: Vec::new(),
            is_submitting: false,
            is_loading: false,
            current: Page::default(),
            active: None,
        }
    }

    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.search = Debounced::new(self.search.settled().clone(), delay);
        self
    }

    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Search term the current query uses.
    pub fn applied_search(&self) -> &str {
        self.search.settled()
    }

    pub fn sort(&self) -> Option<SortState<ColumnOf<R>>> {
        self.sort
    }

    pub fn filter(&self) -> &R::Filter {
        &self.filter
    }

    pub fn modal(&self) -> &ModalFor<R> {
        &self.modal
    }

    pub fn selected(&self) -> Option<&R::Entity> {
        self.selected.as_ref()
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn set_capabilities(&mut self, capabilities: Capabilities) {
        self.capabilities = capabilities;
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Last page fetched, unsorted.
    pub fn current(&self) -> &Page<R::Entity> {
        &self.current
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Hands pending toasts to the renderer.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn form_errors(&self) -> &[(String, String)] {
        &self.form_errors
    }

    /// Records a keystroke in the search box. The query follows once the
    /// input has been idle for the debounce delay, see [`Self::tick`].
    pub fn on_search_change(&mut self, text: impl Into<String>, now: Instant) {
        self.search.set(text.into(), now);
    }

    /// Applies a settled search term. Returns `true` when the query changed
    /// and the screen should [`load`](Self::load) again.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.search.poll(now) {
            self.page = 1;
            return true;
        }
        false
    }

    /// Applies the typed search term without waiting, e.g. on Enter.
    pub fn flush_search(&mut self) -> bool {
        if self.search.flush() {
            self.page = 1;
            return true;
        }
        false
    }

    pub fn on_sort_change(&mut self, column: ColumnOf<R>) {
        self.sort = Some(toggle(self.sort, column));
    }

    pub fn on_page_change(&mut self, page: u32) -> bool {
        let page = page.max(1);
        let changed = page != self.page;
        self.page = page;
        changed
    }

    pub fn on_page_size_change(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.page = 1;
    }

    pub fn on_filter_change(&mut self, filter: R::Filter) -> bool {
        if filter == self.filter {
            return false;
        }
        self.filter = filter;
        self.page = 1;
        true
    }

    /// Parameters of the query the screen currently shows.
    pub fn params(&self) -> ListParams<R::Filter> {
        ListParams::new(self.page, self.page_size.get())
            .search(self.search.settled().as_str())
            .filter(self.filter.clone())
    }

    /// Fetches the current page and subscribes to it, dropping the
    /// subscription of the previously shown query.
    pub fn load<T: Transport>(&mut self, client: &mut ApiClient<T>) -> ControllerResult<()> {
        ensure(&self.capabilities, Action::View, R::KIND)?;

        let params = self.params();
        let request = params.to_request(R::PATH);
        if self.active.as_ref() != Some(&request) {
            if let Some(previous) = self.active.take() {
                client.unsubscribe(&previous);
            }
            client.subscribe(&request);
            self.active = Some(request);
        }

        self.is_loading = true;
        let result = client.list::<R>(&params);
        self.is_loading = false;

        match result {
            Ok(page) => {
                let summary = PageSummary::new(self.page, self.page_size.get(), page.meta.total);
                let last_page = summary.total_pages.max(1);
                self.current = page;
                // Deleting the last row of the last page leaves us past the end.
                if self.current.data.is_empty() && self.page > last_page {
                    self.page = last_page;
                    return self.load(client);
                }
                Ok(())
            }
            Err(err) => {
                let fallback = format!("Failed to load {}", plural(R::LABEL));
                self.fail(&err, &fallback);
                Err(err.into())
            }
        }
    }

    /// Drops the subscription of the shown query, e.g. when the screen closes.
    pub fn detach<T: Transport>(&mut self, client: &mut ApiClient<T>) {
        if let Some(request) = self.active.take() {
            client.unsubscribe(&request);
        }
    }

    /// Rows of the current page, ordered by the active sort.
    pub fn rows(&self) -> Vec<R::Entity> {
        let mut rows = self.current.data.clone();
        if let Some(state) = self.sort {
            sort_rows(&mut rows, state);
        }
        rows
    }

    pub fn view(&self) -> ListView<R::Entity, ColumnOf<R>> {
        let summary = PageSummary::new(self.page, self.page_size.get(), self.current.meta.total);
        ListView {
            title: R::LABEL,
            rows: self.rows(),
            caption: summary.caption(),
            pages: page_window(summary.total_pages, self.page),
            summary,
            page_size: self.page_size.get(),
            page_sizes: PageSize::ALL.iter().map(|size| size.get()).collect(),
            search: self.search.raw().clone(),
            sort: self.sort,
            sorted_within_page: self.sort.is_some() && summary.total_pages > 1,
            is_loading: self.is_loading,
            is_submitting: self.is_submitting,
            can_create: can(&self.capabilities, Action::Create, R::KIND),
            can_edit: can(&self.capabilities, Action::Edit, R::KIND),
            can_delete: can(&self.capabilities, Action::Delete, R::KIND),
            can_approve: can(&self.capabilities, Action::Approve, R::KIND),
            notifications: self.notifications.clone(),
            form_errors: self.form_errors.clone(),
        }
    }

    pub fn on_add(&mut self) -> ControllerResult<()> {
        ensure(&self.capabilities, Action::Create, R::KIND)?;
        self.selected = None;
        self.open(Modal::Create(R::Form::default()));
        Ok(())
    }

    pub fn on_edit(&mut self, entity: &R::Entity) -> ControllerResult<()> {
        ensure(&self.capabilities, Action::Edit, R::KIND)?;
        self.selected = Some(entity.clone());
        self.open(Modal::Edit {
            id: R::entity_id(entity),
            form: R::edit_form(entity),
        });
        Ok(())
    }

    /// Opens the create dialog prefilled from `entity`.
    pub fn on_duplicate(&mut self, entity: &R::Entity) -> ControllerResult<()> {
        ensure(&self.capabilities, Action::Create, R::KIND)?;
        self.selected = Some(entity.clone());
        self.open(Modal::Create(R::duplicate_form(entity)));
        Ok(())
    }

    pub fn on_delete(&mut self, entity: &R::Entity) -> ControllerResult<()> {
        ensure(&self.capabilities, Action::Delete, R::KIND)?;
        self.selected = Some(entity.clone());
        self.open(Modal::ConfirmDelete(entity.clone()));
        Ok(())
    }

    pub fn close_modal(&mut self) {
        self.modal = Modal::Closed;
        self.form_errors.clear();
    }

    /// Form of the open create/edit dialog.
    pub fn draft_mut(&mut self) -> Option<&mut R::Form> {
        match &mut self.modal {
            Modal::Create(form) | Modal::Edit { form, .. } => Some(form),
            _ => None,
        }
    }

    /// Validates the open form and marks the controller as submitting.
    ///
    /// Validation failures are kept for inline display and nothing is sent.
    /// Every successful call must be followed by [`Self::finish_submit`].
    pub fn prepare_submit(&mut self) -> ControllerResult<Mutation<R>> {
        if self.is_submitting {
            return Err(ControllerError::Busy);
        }
        let (id, result) = match &self.modal {
            Modal::Create(form) => {
                ensure(&self.capabilities, Action::Create, R::KIND)?;
                (None, R::validated_payload(form))
            }
            Modal::Edit { id, form } => {
                ensure(&self.capabilities, Action::Edit, R::KIND)?;
                (Some(*id), R::validated_payload(form))
            }
            _ => return Err(ControllerError::NoDraft),
        };
        let payload = match result {
            Ok(payload) => payload,
            Err(err) => {
                self.form_errors = err.field_errors();
                return Err(err.into());
            }
        };
        self.form_errors.clear();
        self.is_submitting = true;
        Ok(match id {
            Some(id) => Mutation::Update(id, payload),
            None => Mutation::Create(payload),
        })
    }

    /// Settles a write started by [`Self::prepare_submit`]: closes the
    /// dialog on success, keeps it open with an error toast otherwise.
    pub fn finish_submit(
        &mut self,
        mutation: &Mutation<R>,
        result: ApiResult<Option<R::Entity>>,
    ) -> ControllerResult<Option<R::Entity>> {
        self.is_submitting = false;
        match result {
            Ok(entity) => {
                self.push(Notification::success(format!(
                    "{} {}",
                    R::LABEL,
                    mutation.verb()
                )));
                self.close_modal();
                self.selected = None;
                Ok(entity)
            }
            Err(err) => {
                let fallback = format!("Failed to save {}", R::LABEL.to_lowercase());
                self.fail(&err, &fallback);
                Err(err.into())
            }
        }
    }

    /// Validates and sends the open form, then reloads the table.
    pub fn on_submit<T: Transport>(
        &mut self,
        client: &mut ApiClient<T>,
    ) -> ControllerResult<Option<R::Entity>> {
        let mutation = self.prepare_submit()?;
        let result = mutation.execute(client);
        let entity = self.finish_submit(&mutation, result)?;
        self.refresh(client);
        Ok(entity)
    }

    /// Deletes the entity of the confirmation dialog.
    ///
    /// Returns `Ok(false)` when the backend answered without deleting; the
    /// dialog then stays open just like on a transport error.
    pub fn on_confirm_delete<T: Transport>(
        &mut self,
        client: &mut ApiClient<T>,
    ) -> ControllerResult<bool> {
        ensure(&self.capabilities, Action::Delete, R::KIND)?;
        if self.is_submitting {
            return Err(ControllerError::Busy);
        }
        let id = match &self.modal {
            Modal::ConfirmDelete(entity) => R::entity_id(entity),
            _ => return Err(ControllerError::NoDraft),
        };

        self.is_submitting = true;
        let result = client.delete::<R>(id);
        self.is_submitting = false;

        let fallback = format!("Failed to delete {}", R::LABEL.to_lowercase());
        match result {
            Ok(true) => {
                self.push(Notification::success(format!("{} deleted", R::LABEL)));
                self.close_modal();
                self.selected = None;
                self.refresh(client);
                Ok(true)
            }
            Ok(false) => {
                log::error!("Backend refused to delete {} {id:?}", R::LABEL);
                self.push(Notification::error(fallback));
                Ok(false)
            }
            Err(err) => {
                self.fail(&err, &fallback);
                Err(err.into())
            }
        }
    }

    /// Runs a one-off write with the same guard, toasts and reload as a
    /// form submission.
    fn run_write<T, Out>(
        &mut self,
        client: &mut ApiClient<T>,
        action: Action,
        success: String,
        failure: String,
        write: impl FnOnce(&mut ApiClient<T>) -> ApiResult<Out>,
    ) -> ControllerResult<Out>
    where
        T: Transport,
    {
        ensure(&self.capabilities, action, R::KIND)?;
        if self.is_submitting {
            return Err(ControllerError::Busy);
        }
        self.is_submitting = true;
        let result = write(client);
        self.is_submitting = false;
        match result {
            Ok(out) => {
                self.push(Notification::success(success));
                self.refresh(client);
                Ok(out)
            }
            Err(err) => {
                self.fail(&err, &failure);
                Err(err.into())
            }
        }
    }

    fn open(&mut self, modal: ModalFor<R>) {
        self.form_errors.clear();
        self.modal = modal;
    }

    fn refresh<T: Transport>(&mut self, client: &mut ApiClient<T>) {
        if self.active.is_none() {
            return;
        }
        if let Err(err) = self.load(client) {
            log::warn!("Reloading {} after a write failed: {err}", plural(R::LABEL));
        }
    }

    fn push(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    fn fail(&mut self, err: &ApiError, fallback: &str) {
        log::error!("{fallback}: {err}");
        self.push(Notification::error(err.user_message(fallback)));
    }
}

impl ListController<KarkunJoinRequests> {
    /// Approves or rejects a join request.
    pub fn on_approve<T: Transport>(
        &mut self,
        client: &mut ApiClient<T>,
        id: KarkunJoinRequestId,
        is_approved: bool,
    ) -> ControllerResult<()> {
        let success = if is_approved {
            "Join request approved"
        } else {
            "Join request rejected"
        };
        self.run_write(
            client,
            Action::Approve,
            success.to_string(),
            "Failed to update join request".to_string(),
            |client| client.approve_join_request(id, is_approved),
        )
    }
}

impl ListController<Questions> {
    /// Stores the answer typed for a pending question.
    pub fn on_answer<T: Transport>(
        &mut self,
        client: &mut ApiClient<T>,
        id: QuestionId,
        form: &AnswerForm,
    ) -> ControllerResult<()> {
        ensure(&self.capabilities, Action::Edit, Questions::KIND)?;
        let answer = match form.to_payload() {
            Ok(answer) => answer,
            Err(err) => {
                self.form_errors = err.field_errors();
                return Err(err.into());
            }
        };
        self.run_write(
            client,
            Action::Edit,
            "Answer saved".to_string(),
            "Failed to save answer".to_string(),
            |client| client.answer_question(id, &answer),
        )
    }
}

fn plural(label: &str) -> String {
    format!("{}s", label.to_lowercase())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::resources::Zones;
    use crate::controller::columns::ZoneColumn;
    use crate::controller::sort::SortDirection;
    use crate::permissions::ResourceKind;
    use crate::transport::mock::MockTransport;

    fn zone_row(id: i32, title: &str) -> serde_json::Value {
        json!({"id": id, "title_en": title, "primary_phone_number": "03001234567"})
    }

    #[test]
    fn rapid_typing_settles_once_with_last_value() {
        let start = Instant::now();
        let mut controller = ListController::<Zones>::new(Capabilities::super_admin());
        controller.on_page_change(4);

        controller.on_search_change("l", start);
        controller.on_search_change("la", start + Duration::from_millis(100));
        controller.on_search_change("lah", start + Duration::from_millis(200));

        assert!(!controller.tick(start + Duration::from_millis(600)));
        assert!(controller.tick(start + Duration::from_millis(700)));
        assert!(!controller.tick(start + Duration::from_millis(1500)));
        assert_eq!(controller.applied_search(), "lah");
        assert_eq!(controller.page(), 1);
    }

    #[test]
    fn page_size_change_resets_page() {
        let mut controller = ListController::<Zones>::new(Capabilities::super_admin());
        controller.on_page_change(3);

        controller.on_page_size_change(PageSize::Fifty);

        assert_eq!(controller.page(), 1);
        assert_eq!(controller.params().size, 50);
    }

    #[test]
    fn sort_only_reorders_the_fetched_page() {
        let mut transport = MockTransport::new();
        transport.expect_send().times(1).returning(|_| {
            Ok(json!({
                "data": [zone_row(1, "Multan"), zone_row(2, "Karachi"), zone_row(3, "Lahore")],
                "meta": {"total": 30}
            }))
        });
        let mut client = ApiClient::new(transport);
        let mut controller = ListController::<Zones>::new(Capabilities::super_admin());
        controller.load(&mut client).unwrap();

        controller.on_sort_change(ZoneColumn::Title);
        let ascending: Vec<String> = controller.rows().into_iter().map(|z| z.title_en).collect();
        controller.on_sort_change(ZoneColumn::Title);
        let view = controller.view();

        assert_eq!(ascending, vec!["Karachi", "Lahore", "Multan"]);
        assert_eq!(view.rows[0].title_en, "Multan");
        assert_eq!(view.sort.map(|s| s.direction), Some(SortDirection::Descending));
        assert!(view.sorted_within_page);
        assert_eq!(view.caption, "Showing 1–10 of 30");
        assert_eq!(view.pages, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn affordances_follow_capabilities() {
        let caps = Capabilities::none()
            .allow(Action::View, ResourceKind::Zones)
            .allow(Action::Edit, ResourceKind::Zones);
        let mut controller = ListController::<Zones>::new(caps);

        let view = controller.view();

        assert!(view.can_edit);
        assert!(!view.can_create);
        assert!(!view.can_delete);
        assert!(matches!(controller.on_add(), Err(ControllerError::Forbidden(_))));
        assert!(!controller.modal().is_open());
    }

    #[test]
    fn second_submit_while_in_flight_is_busy() {
        let mut controller = ListController::<Zones>::new(Capabilities::super_admin());
        controller.on_add().unwrap();
        let form = controller.draft_mut().unwrap();
        form.title_en = "Lahore Zone".into();
        form.title_ur = "لاہور زون".into();
        form.country_en = "Pakistan".into();
        form.country_ur = "پاکستان".into();
        form.city_en = "Lahore".into();
        form.city_ur = "لاہور".into();
        form.primary_phone_number = "03001234567".into();

        let mutation = controller.prepare_submit().unwrap();

        assert!(controller.is_submitting());
        assert!(matches!(controller.prepare_submit(), Err(ControllerError::Busy)));

        let failed = controller.finish_submit(
            &mutation,
            Err(ApiError::Http {
                status: 422,
                message: Some("Title already taken".into()),
            }),
        );

        assert!(failed.is_err());
        assert!(!controller.is_submitting());
        assert!(controller.modal().is_open());
        assert_eq!(
            controller.take_notifications(),
            vec![Notification::error("Title already taken")]
        );
    }

    #[test]
    fn invalid_form_is_not_sent() {
        let mut controller = ListController::<Zones>::new(Capabilities::super_admin());
        controller.on_add().unwrap();

        let result = controller.prepare_submit();

        assert!(matches!(result, Err(ControllerError::Form(_))));
        assert!(!controller.is_submitting());
        assert!(
            controller
                .form_errors()
                .iter()
                .any(|(field, _)| field == "primary_phone_number")
        );
    }

    #[test]
    fn submit_without_dialog_is_rejected() {
        let mut controller = ListController::<Zones>::new(Capabilities::super_admin());

        assert!(matches!(controller.prepare_submit(), Err(ControllerError::NoDraft)));
    }
}
