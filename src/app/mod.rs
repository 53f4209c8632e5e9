mod controller;
mod preview;
mod state;
mod toast;
mod ui;

use crate::i18n::{Catalog, Localizer, MessageKey};
use crate::settings::Settings;
use crate::upload::{
    RegistrationClient, RegistrationError, RegistrationReceipt, RegistrationTransport,
    SelectedFile,
};
use eframe::{egui, App};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use controller::{PendingSubmission, SubmissionController, SubmissionTicket};
use preview::TexturePreviews;
use toast::{Notifier, ToastQueue};

/// Image extensions offered by the file picker. Only a hint; nothing else is enforced.
const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "webp", "bmp", "heic"];

type Outcome = Result<RegistrationReceipt, RegistrationError>;

struct InFlight {
    ticket: SubmissionTicket,
    receiver: Receiver<Outcome>,
}

pub struct RegisterScreen {
    controller: SubmissionController<ToastQueue, TexturePreviews>,
    client: Arc<RegistrationClient>,
    in_flight: Option<InFlight>,
}

impl RegisterScreen {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: &Settings,
        catalog: Catalog,
        client: RegistrationClient,
    ) -> Self {
        tracing::info!(endpoint = client.endpoint(), "initializing registration screen");
        let toasts = ToastQueue::new(Duration::from_secs(settings.toast_seconds));
        let previews = TexturePreviews::new(cc.egui_ctx.clone(), settings.preview_max_dimension);
        Self {
            controller: SubmissionController::new(toasts, previews, Localizer::new(catalog)),
            client: Arc::new(client),
            in_flight: None,
        }
    }

    pub fn pick_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &IMAGE_EXTENSIONS)
            .pick_file()
        {
            self.load_file(&path);
        }
    }

    fn load_file(&mut self, path: &Path) {
        match SelectedFile::from_path(path) {
            Ok(file) => self.controller.select_file(file),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read photo");
                let message = self.controller.text(MessageKey::FileUnreadable);
                self.controller.notifier_mut().notify_error(&message);
            }
        }
    }

    pub fn start_submit(&mut self) {
        let Some(PendingSubmission { ticket, form }) = self.controller.begin_submit() else {
            return;
        };

        let (sender, receiver) = mpsc::channel();
        self.in_flight = Some(InFlight { ticket, receiver });
        let client = Arc::clone(&self.client);

        // If this thread dies before sending, the closed channel is reported
        // as a lost worker by `poll_submission`.
        std::thread::spawn(move || {
            let outcome = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt.block_on(client.register(form)),
                Err(e) => Err(RegistrationError::Transport(format!(
                    "failed to start async runtime: {}",
                    e
                ))),
            };
            let _ = sender.send(outcome);
        });
    }

    pub fn clear(&mut self) {
        tracing::info!("clearing registration form");
        self.in_flight = None;
        self.controller.clear();
    }

    fn poll_submission(&mut self) {
        let Some(in_flight) = &self.in_flight else {
            return;
        };

        let outcome = match in_flight.receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err(RegistrationError::WorkerLost),
        };
        let ticket = in_flight.ticket;
        self.in_flight = None;
        self.controller.finish_submit(ticket, outcome);
    }

    fn accept_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if let Some(path) = dropped.into_iter().find_map(|file| file.path) {
            self.load_file(&path);
        }
    }
}

impl App for RegisterScreen {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_submission();
        self.accept_dropped_files(ctx);
        self.render(ctx);
        self.controller.notifier_mut().show(ctx);

        if self.controller.is_loading() || !self.controller.notifier_mut().is_empty() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
