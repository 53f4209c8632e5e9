use crate::app::preview::PreviewRenderer;
use crate::app::state::{FormField, FormState, SubmissionStatus};
use crate::app::toast::Notifier;
use crate::i18n::{Localizer, MessageKey};
use crate::upload::{
    FailureKind, RegistrationError, RegistrationForm, RegistrationReceipt, SelectedFile,
};

/// Identifies one submission attempt. Outcomes carrying a ticket from before
/// the last reset are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket(u64);

#[derive(Debug)]
pub struct PendingSubmission {
    pub ticket: SubmissionTicket,
    pub form: RegistrationForm,
}

pub struct SubmissionController<N, P: PreviewRenderer> {
    form: FormState,
    file: Option<SelectedFile>,
    preview: Option<P::Preview>,
    status: SubmissionStatus,
    generation: u64,
    notifier: N,
    previews: P,
    localizer: Localizer,
}

impl<N: Notifier, P: PreviewRenderer> SubmissionController<N, P> {
    pub fn new(notifier: N, previews: P, localizer: Localizer) -> Self {
        Self {
            form: FormState::default(),
            file: None,
            preview: None,
            status: SubmissionStatus::Idle,
            generation: 0,
            notifier,
            previews,
            localizer,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn update_field(&mut self, field: FormField, value: impl Into<String>) {
        *self.form.field_mut(field) = value.into();
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn preview(&self) -> Option<&P::Preview> {
        self.preview.as_ref()
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn text(&self, key: MessageKey) -> String {
        self.localizer.resolve(key)
    }

    pub fn select_file(&mut self, file: SelectedFile) {
        tracing::info!(file = %file.file_name, size = file.bytes.len(), "photo selected");
        // The old preview must be gone before the new one exists.
        self.preview = None;
        self.preview = self.previews.create_preview(&file);
        self.file = Some(file);
        // A running upload keeps the trigger disabled until its outcome lands.
        if !self.is_loading() {
            self.status = SubmissionStatus::Idle;
        }

        let message = self.localizer.resolve(MessageKey::ImageSelected);
        self.notifier.notify_success(&message);
    }

    /// Validates the form and enters `Loading`.
    ///
    /// Returns `None` when a submission is already in flight or a required
    /// input is missing; in the latter case the status is set to `Error`.
    pub fn begin_submit(&mut self) -> Option<PendingSubmission> {
        if self.is_loading() {
            tracing::debug!("submission already in flight");
            return None;
        }

        let photo = match &self.file {
            Some(file) if self.form.has_required_names() => file.clone(),
            _ => {
                tracing::warn!(kind = ?FailureKind::Validation, "required fields missing");
                let message = self.localizer.resolve(MessageKey::RequiredFields);
                self.fail(message);
                return None;
            }
        };

        self.status = SubmissionStatus::Loading;
        Some(PendingSubmission {
            ticket: SubmissionTicket(self.generation),
            form: RegistrationForm {
                first_name: self.form.first_name.clone(),
                last_name: self.form.last_name.clone(),
                middle_name: self.form.middle_name().map(str::to_string),
                photo,
            },
        })
    }

    /// Applies the outcome of a submission and leaves `Loading` on every path.
    pub fn finish_submit(
        &mut self,
        ticket: SubmissionTicket,
        outcome: Result<RegistrationReceipt, RegistrationError>,
    ) {
        if ticket.0 != self.generation || !self.is_loading() {
            tracing::debug!(?ticket, ?outcome, "discarding outcome of a reset submission");
            return;
        }

        match outcome {
            Ok(receipt) => {
                tracing::info!(qr_code_url = %receipt.qr_code_url, "registration succeeded");
                let message = self.localizer.resolve(MessageKey::RegisterSuccess);
                self.status = SubmissionStatus::Success(message.clone());
                self.notifier.notify_success(&message);
                self.clear();
            }
            Err(err) => {
                tracing::warn!(kind = ?err.kind(), error = %err, "registration failed");
                let message = self.failure_message(&err);
                self.fail(message);
            }
        }
    }

    /// Runs a whole attempt inline. The window splits this around its worker
    /// thread instead.
    #[cfg(test)]
    pub async fn submit<T>(&mut self, transport: &T)
    where
        T: crate::upload::RegistrationTransport + ?Sized,
    {
        let Some(pending) = self.begin_submit() else {
            return;
        };
        let outcome = transport.register(pending.form).await;
        self.finish_submit(pending.ticket, outcome);
    }

    pub fn clear(&mut self) {
        self.form = FormState::default();
        self.file = None;
        self.preview = None;
        self.status = SubmissionStatus::Idle;
        self.generation += 1;
    }

    fn failure_message(&self, err: &RegistrationError) -> String {
        match (err.kind(), err.server_message()) {
            (_, Some(message)) => message.to_string(),
            (FailureKind::Application, None) => {
                self.localizer.resolve(MessageKey::RegisterFailed)
            }
            _ => self.localizer.resolve(MessageKey::SystemFailure),
        }
    }

    fn fail(&mut self, message: String) {
        self.notifier.notify_error(&message);
        self.status = SubmissionStatus::Error(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::RegistrationTransport;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingNotifier {
        events: Vec<(&'static str, String)>,
    }

    impl Notifier for RecordingNotifier {
        fn notify_success(&mut self, message: &str) {
            self.events.push(("success", message.to_string()));
        }

        fn notify_error(&mut self, message: &str) {
            self.events.push(("error", message.to_string()));
        }
    }

    struct CountedPreview {
        live: Arc<AtomicUsize>,
    }

    impl Drop for CountedPreview {
        fn drop(&mut self) {
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    struct CountingPreviews {
        live: Arc<AtomicUsize>,
        peak: usize,
    }

    impl PreviewRenderer for CountingPreviews {
        type Preview = CountedPreview;

        fn create_preview(&mut self, _file: &SelectedFile) -> Option<CountedPreview> {
            let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak = self.peak.max(live);
            Some(CountedPreview {
                live: self.live.clone(),
            })
        }
    }

    struct ScriptedTransport {
        reply: Result<RegistrationReceipt, RegistrationError>,
        sent: Mutex<Vec<RegistrationForm>>,
    }

    impl ScriptedTransport {
        fn replying(reply: Result<RegistrationReceipt, RegistrationError>) -> Self {
            Self {
                reply,
                sent: Mutex::new(Vec::new()),
            }
        }

        fn accepted() -> Self {
            Self::replying(Ok(RegistrationReceipt {
                qr_code_url: "https://qr.example/42.png".into(),
            }))
        }

        fn calls(&self) -> usize {
            self.sent.lock().expect("lock").len()
        }
    }

    #[async_trait]
    impl RegistrationTransport for ScriptedTransport {
        async fn register(
            &self,
            form: RegistrationForm,
        ) -> Result<RegistrationReceipt, RegistrationError> {
            self.sent.lock().expect("lock").push(form);
            self.reply.clone()
        }
    }

    type TestController = SubmissionController<RecordingNotifier, CountingPreviews>;

    fn controller() -> TestController {
        SubmissionController::new(
            RecordingNotifier::default(),
            CountingPreviews::default(),
            Localizer::default(),
        )
    }

    fn filled() -> TestController {
        let mut controller = controller();
        controller.update_field(FormField::FirstName, "Ali");
        controller.update_field(FormField::LastName, "Valiyev");
        controller.select_file(SelectedFile::new("face.jpg", vec![1, 2, 3]));
        controller
    }

    fn live_previews(controller: &TestController) -> usize {
        controller.previews.live.load(Ordering::SeqCst)
    }

    #[tokio::test]
    async fn missing_required_input_never_reaches_network() {
        let cases: [fn(&mut TestController); 3] = [
            |c| c.update_field(FormField::FirstName, ""),
            |c| c.update_field(FormField::LastName, ""),
            |c| c.file = None,
        ];

        for break_form in cases {
            let mut controller = filled();
            break_form(&mut controller);
            let transport = ScriptedTransport::accepted();

            controller.submit(&transport).await;

            assert_eq!(transport.calls(), 0);
            assert_eq!(
                controller.status(),
                &SubmissionStatus::Error(
                    "Iltimos, barcha majburiy maydonlarni to‘ldiring.".into()
                )
            );
            assert!(!controller.is_loading());
            assert_eq!(
                controller.notifier.events.last().map(|(kind, _)| *kind),
                Some("error")
            );
        }
    }

    #[tokio::test]
    async fn sends_one_request_with_middle_name_only_when_filled() {
        let mut controller = filled();
        let transport = ScriptedTransport::replying(Err(RegistrationError::Rejected {
            status: 500,
            message: None,
        }));

        controller.submit(&transport).await;
        controller.update_field(FormField::MiddleName, "Karimovich");
        controller.submit(&transport).await;

        let sent = transport.sent.lock().expect("lock");
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].middle_name, None);
        assert_eq!(sent[1].middle_name.as_deref(), Some("Karimovich"));
        assert_eq!(sent[1].first_name, "Ali");
        assert_eq!(sent[1].photo.file_name, "face.jpg");
    }

    #[tokio::test]
    async fn success_notifies_and_resets_everything() {
        let mut controller = filled();
        controller.update_field(FormField::MiddleName, "Karimovich");
        let transport = ScriptedTransport::accepted();

        controller.submit(&transport).await;

        assert_eq!(transport.calls(), 1);
        assert_eq!(controller.form(), &FormState::default());
        assert!(controller.selected_file().is_none());
        assert!(controller.preview().is_none());
        assert_eq!(live_previews(&controller), 0);
        assert_eq!(controller.status(), &SubmissionStatus::Idle);
        assert_eq!(
            controller.notifier.events.last(),
            Some(&(
                "success",
                "QR kod muvaffaqiyatli ro‘yxatdan o‘tkazildi!".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn missing_marker_keeps_form_for_retry() {
        let mut controller = filled();
        let transport = ScriptedTransport::replying(Err(RegistrationError::Rejected {
            status: 200,
            message: None,
        }));

        controller.submit(&transport).await;

        assert_eq!(
            controller.status(),
            &SubmissionStatus::Error("Xatolik yuz berdi.".into())
        );
        assert_eq!(controller.form().first_name, "Ali");
        assert_eq!(controller.form().last_name, "Valiyev");
        assert!(controller.selected_file().is_some());
        assert!(controller.preview().is_some());
    }

    #[tokio::test]
    async fn server_message_takes_priority() {
        let mut controller = filled();
        let transport = ScriptedTransport::replying(Err(RegistrationError::Rejected {
            status: 409,
            message: Some("Allaqachon ro‘yxatdan o‘tgan".into()),
        }));

        controller.submit(&transport).await;

        assert_eq!(
            controller.status(),
            &SubmissionStatus::Error("Allaqachon ro‘yxatdan o‘tgan".into())
        );
        assert_eq!(
            controller.notifier.events.last(),
            Some(&("error", "Allaqachon ro‘yxatdan o‘tgan".to_string()))
        );
    }

    #[tokio::test]
    async fn transport_failure_uses_generic_message() {
        let mut controller = filled();
        let before = controller.form().clone();
        let transport = ScriptedTransport::replying(Err(RegistrationError::Transport(
            "connection refused".into(),
        )));

        controller.submit(&transport).await;

        assert_eq!(
            controller.status(),
            &SubmissionStatus::Error("Tizimda xatolik yuz berdi.".into())
        );
        assert!(!controller.is_loading());
        assert_eq!(controller.form(), &before);
        assert!(controller.selected_file().is_some());
    }

    #[test]
    fn clear_resets_from_any_state() {
        let mut controller = filled();
        controller.update_field(FormField::MiddleName, "Karimovich");
        let pending = controller.begin_submit().expect("pending");
        assert!(controller.is_loading());

        controller.clear();

        assert_eq!(controller.form(), &FormState::default());
        assert!(controller.selected_file().is_none());
        assert!(controller.preview().is_none());
        assert_eq!(live_previews(&controller), 0);
        assert_eq!(controller.status(), &SubmissionStatus::Idle);

        // A late reply for the cleared attempt changes nothing.
        controller.finish_submit(
            pending.ticket,
            Err(RegistrationError::Transport("late".into())),
        );
        assert_eq!(controller.status(), &SubmissionStatus::Idle);
    }

    #[test]
    fn second_submit_is_refused_while_loading() {
        let mut controller = filled();
        let first = controller.begin_submit();
        assert!(first.is_some());
        assert!(controller.begin_submit().is_none());
        assert!(controller.is_loading());
    }

    #[test]
    fn lost_worker_releases_loading() {
        let mut controller = filled();
        let pending = controller.begin_submit().expect("pending");

        controller.finish_submit(pending.ticket, Err(RegistrationError::WorkerLost));

        assert!(!controller.is_loading());
        assert_eq!(
            controller.status(),
            &SubmissionStatus::Error("Tizimda xatolik yuz berdi.".into())
        );
    }

    #[test]
    fn replacing_file_releases_previous_preview() {
        let mut controller = filled();
        assert_eq!(live_previews(&controller), 1);

        controller.select_file(SelectedFile::new("second.png", vec![4, 5, 6]));
        controller.select_file(SelectedFile::new("third.png", vec![7, 8, 9]));

        assert_eq!(live_previews(&controller), 1);
        assert_eq!(controller.previews.peak, 1);
        assert_eq!(
            controller.selected_file().map(|f| f.file_name.as_str()),
            Some("third.png")
        );
    }

    #[test]
    fn selecting_file_clears_status_and_notifies() {
        let mut controller = controller();
        assert!(controller.begin_submit().is_none());
        assert!(matches!(controller.status(), SubmissionStatus::Error(_)));

        controller.select_file(SelectedFile::new("face.jpg", vec![1]));

        assert_eq!(controller.status(), &SubmissionStatus::Idle);
        assert_eq!(
            controller.notifier.events.last(),
            Some(&("success", "Rasm tanlandi".to_string()))
        );
    }

    #[test]
    fn selecting_file_mid_upload_keeps_single_attempt() {
        let mut controller = filled();
        let pending = controller.begin_submit().expect("pending");

        controller.select_file(SelectedFile::new("retake.jpg", vec![9, 9]));

        assert!(controller.is_loading());
        assert!(controller.begin_submit().is_none());

        controller.finish_submit(
            pending.ticket,
            Ok(RegistrationReceipt {
                qr_code_url: "https://qr.example/7.png".into(),
            }),
        );
        assert_eq!(controller.status(), &SubmissionStatus::Idle);
        assert!(controller.selected_file().is_none());
        assert_eq!(controller.form(), &FormState::default());
        assert_eq!(
            controller.notifier.events.last(),
            Some(&(
                "success",
                "QR kod muvaffaqiyatli ro‘yxatdan o‘tkazildi!".to_string()
            ))
        );
    }

    #[test]
    fn editing_fields_mid_upload_keeps_loading() {
        let mut controller = filled();
        let pending = controller.begin_submit().expect("pending");

        controller.update_field(FormField::MiddleName, "Karimovich");
        controller.update_field(FormField::FirstName, "");

        assert!(controller.is_loading());
        assert!(controller.begin_submit().is_none());

        controller.finish_submit(
            pending.ticket,
            Err(RegistrationError::Rejected {
                status: 500,
                message: None,
            }),
        );
        assert_eq!(
            controller.status(),
            &SubmissionStatus::Error("Xatolik yuz berdi.".into())
        );
        assert_eq!(controller.form().middle_name, "Karimovich");
    }
}
