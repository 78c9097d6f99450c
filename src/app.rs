use crate::{
    assistant, auth,
    auth::AuthSession,
    config::Config,
    countries,
    debounce::{defer, Debouncer},
    model::{Chatroom, Country, Message, Sender},
    storage::{keys, Storage},
    store::{ChatStore, SessionState},
    theme,
    uploads,
    validation::{self, ValidationResult},
};
use anyhow::Result;
use serde_json::json;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Which page the client is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login(LoginStep),
    Dashboard,
    ChatRoom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStep {
    Phone,
    Otp,
}

/// Events driving the client. Processed strictly in arrival order by the one
/// event-loop task; timers deliver their completion as further events on the
/// same channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    PhoneSubmitted { phone_number: String, country: String },
    OtpSent,
    OtpSubmitted { otp: String },
    LoginRedirect,
    Logout,
    CreateChatroom { title: String },
    DeleteChatroom { id: String },
    OpenChatroom { id: String },
    BackToDashboard,
    SearchInput { term: String },
    SearchCommitted { term: String },
    SendText { text: String },
    AttachImage { data: Vec<u8> },
    AssistantReply { room_id: String, text: String },
    ToggleDarkMode,
    Shutdown,
}

/// Transient user-facing notice; the UI layer renders these as toasts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub success: bool,
    pub text: String,
}

/// The client application: owns the store, the durable storage, and every
/// pending timer. All state transitions funnel through `handle_event`.
pub struct App {
    store: ChatStore,
    storage: Storage,
    config: Config,
    route: Route,
    auth: Option<AuthSession>,
    pending_login: Option<(String, String)>,
    search_input: String,
    search_term: String,
    search_debounce: Debouncer,
    pending_replies: Vec<JoinHandle<()>>,
    countries: Vec<Country>,
    notices: Vec<Notice>,
    tx: UnboundedSender<AppEvent>,
}

impl App {
    /// Build the client: open storage, rehydrate persisted state, seed the
    /// default chatrooms, and derive the initial theme.
    pub async fn new(config: Config, tx: UnboundedSender<AppEvent>) -> Result<Self> {
        let mut storage = Storage::open(&config.data_dir).await?;

        let dark_mode =
            theme::initial_dark_mode(storage.get_str(keys::THEME), config.prefers_dark);
        storage
            .put(keys::THEME, json!(theme::stored_name(dark_mode)))
            .await?;

        let mut store = ChatStore::new(dark_mode);
        // seed the two example rooms only when nothing was ever persisted;
        // a persisted empty list stays empty
        match storage
            .get(keys::CHATROOMS)
            .and_then(|value| serde_json::from_value::<Vec<Chatroom>>(value.clone()).ok())
        {
            Some(rooms) => store.set_chatrooms(rooms),
            None => {
                let seeded = vec![
                    Chatroom::new("General Chat"),
                    Chatroom::new("Project Discussion"),
                ];
                storage
                    .put(keys::CHATROOMS, serde_json::to_value(&seeded)?)
                    .await?;
                store.set_chatrooms(seeded);
            }
        }

        let auth = auth::restore(&storage);
        let route = match auth {
            Some(_) => Route::Dashboard,
            None => Route::Login(LoginStep::Phone),
        };

        let search_debounce = Debouncer::new(config.search_debounce());
        let mut app = Self {
            store,
            storage,
            config,
            route,
            auth,
            pending_login: None,
            search_input: String::new(),
            search_term: String::new(),
            search_debounce,
            pending_replies: Vec::new(),
            countries: Vec::new(),
            notices: Vec::new(),
            tx,
        };
        if matches!(app.route, Route::Login(_)) {
            app.ensure_countries().await;
        }
        Ok(app)
    }

    /// Drive the event loop until the channel closes or `Shutdown` arrives.
    pub async fn run(mut self, mut rx: UnboundedReceiver<AppEvent>) -> Result<()> {
        while let Some(event) = rx.recv().await {
            if matches!(event, AppEvent::Shutdown) {
                break;
            }
            if let Err(err) = self.handle_event(event).await {
                warn!("event failed: {err}");
            }
        }
        Ok(())
    }

    /// Apply one event. Transitions are synchronous; anything slow happens in
    /// a spawned timer that reports back through the channel.
    pub async fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::PhoneSubmitted {
                phone_number,
                country,
            } => self.submit_phone(phone_number, country),
            AppEvent::OtpSent => self.otp_sent(),
            AppEvent::OtpSubmitted { otp } => self.submit_otp(&otp).await?,
            AppEvent::LoginRedirect => self.login_redirect(),
            AppEvent::Logout => self.logout().await?,
            AppEvent::CreateChatroom { title } => self.create_chatroom(&title).await?,
            AppEvent::DeleteChatroom { id } => self.delete_chatroom(&id).await?,
            AppEvent::OpenChatroom { id } => self.open_chatroom(&id),
            AppEvent::BackToDashboard => self.back_to_dashboard(),
            AppEvent::SearchInput { term } => self.search_input(term),
            AppEvent::SearchCommitted { term } => self.search_term = term,
            AppEvent::SendText { text } => self.send_text(&text),
            AppEvent::AttachImage { data } => self.attach_image(&data),
            AppEvent::AssistantReply { room_id, text } => self.assistant_reply(&room_id, &text),
            AppEvent::ToggleDarkMode => self.toggle_dark_mode().await?,
            AppEvent::Shutdown => {}
        }
        Ok(())
    }

    // -- login ------------------------------------------------------------

    fn submit_phone(&mut self, phone_number: String, country: String) {
        let result = validation::validate_phone(&phone_number);
        if !result.success {
            self.notify_errors(&result);
            return;
        }
        self.pending_login = Some((phone_number, country));
        self.store.set_is_loading(true);
        let tx = self.tx.clone();
        let _ = defer(self.config.otp_delay(), async move {
            let _ = tx.send(AppEvent::OtpSent);
        });
    }

    fn otp_sent(&mut self) {
        self.store.set_is_loading(false);
        self.route = Route::Login(LoginStep::Otp);
        self.notify(true, "OTP sent successfully!");
    }

    async fn submit_otp(&mut self, otp: &str) -> Result<()> {
        let result = validation::validate_otp(otp);
        if !result.success {
            self.notify_errors(&result);
            return Ok(());
        }
        let Some((phone_number, country)) = self.pending_login.take() else {
            warn!("otp submitted without a pending login");
            return Ok(());
        };
        let session = AuthSession::issue(phone_number, country);
        auth::persist(&mut self.storage, &session).await?;
        self.auth = Some(session);
        self.notify(true, "Verification successful!");
        let tx = self.tx.clone();
        let _ = defer(self.config.redirect_delay(), async move {
            let _ = tx.send(AppEvent::LoginRedirect);
        });
        Ok(())
    }

    fn login_redirect(&mut self) {
        if self.auth.is_some() {
            self.route = Route::Dashboard;
        }
    }

    async fn logout(&mut self) -> Result<()> {
        auth::clear(&mut self.storage).await?;
        self.auth = None;
        self.pending_login = None;
        self.cancel_pending_replies();
        self.store.set_current_chatroom(None);
        self.store.set_messages(Vec::new());
        self.store.set_is_typing(false);
        self.route = Route::Login(LoginStep::Phone);
        self.notify(true, "Logged out successfully!");
        self.ensure_countries().await;
        Ok(())
    }

    // -- dashboard ---------------------------------------------------------

    async fn create_chatroom(&mut self, title: &str) -> Result<()> {
        let result = validation::validate_chatroom(title);
        if !result.success {
            self.notify_errors(&result);
            return Ok(());
        }
        self.store.add_chatroom(Chatroom::new(title));
        self.persist_chatrooms().await?;
        self.notify(true, "Chatroom created successfully!");
        Ok(())
    }

    async fn delete_chatroom(&mut self, id: &str) -> Result<()> {
        self.store.remove_chatroom(id);
        // deleting the selected room would leave a dangling reference;
        // fall back to the dashboard instead
        let selected = self
            .store
            .state()
            .current_chatroom
            .as_ref()
            .is_some_and(|room| room.id == id);
        if selected {
            self.cancel_pending_replies();
            self.store.set_current_chatroom(None);
            self.store.set_messages(Vec::new());
            self.store.set_is_typing(false);
            self.route = Route::Dashboard;
        }
        self.persist_chatrooms().await?;
        self.notify(true, "Chatroom deleted successfully!");
        Ok(())
    }

    fn open_chatroom(&mut self, id: &str) {
        let room = self
            .store
            .state()
            .chatrooms
            .iter()
            .find(|room| room.id == id)
            .cloned();
        match room {
            Some(room) => {
                self.cancel_pending_replies();
                self.store.set_current_chatroom(Some(room));
                self.store.set_messages(Vec::new());
                self.store.set_is_typing(false);
                self.route = Route::ChatRoom;
            }
            None => {
                warn!("chatroom {id} not found, redirecting to dashboard");
                self.store.set_current_chatroom(None);
                self.route = Route::Dashboard;
            }
        }
    }

    fn back_to_dashboard(&mut self) {
        // the selection is kept; a reply still in flight for it is dropped
        // on arrival
        self.store.set_is_typing(false);
        self.route = Route::Dashboard;
    }

    fn search_input(&mut self, term: String) {
        self.search_input = term.clone();
        let tx = self.tx.clone();
        self.search_debounce.schedule(async move {
            let _ = tx.send(AppEvent::SearchCommitted { term });
        });
    }

    /// Rooms matching the committed search term, case-insensitive.
    pub fn filtered_chatrooms(&self) -> Vec<&Chatroom> {
        let needle = self.search_term.to_lowercase();
        self.store
            .state()
            .chatrooms
            .iter()
            .filter(|room| room.title.to_lowercase().contains(&needle))
            .collect()
    }

    // -- chat room ---------------------------------------------------------

    fn send_text(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        let Some(room_id) = self.current_room_id() else {
            return;
        };
        let message = Message::text(Sender::User, text);
        let reply = assistant::reply_to(&message);
        self.store.add_message(message);
        self.schedule_reply(room_id, reply);
    }

    fn attach_image(&mut self, data: &[u8]) {
        let Some(room_id) = self.current_room_id() else {
            return;
        };
        let uri = match uploads::image_data_uri(data, self.config.max_upload_bytes()) {
            Ok(uri) => uri,
            Err(err) => {
                let text = match err.to_string().as_str() {
                    "image_too_large" => "Image size should be less than 5MB",
                    _ => "Please upload an image file",
                };
                self.notify(false, text);
                return;
            }
        };
        let message = Message::image(Sender::User, uri);
        let reply = assistant::reply_to(&message);
        self.store.add_message(message);
        self.notify(true, "Image uploaded successfully!");
        self.schedule_reply(room_id, reply);
    }

    fn schedule_reply(&mut self, room_id: String, text: String) {
        self.store.set_is_typing(true);
        let tx = self.tx.clone();
        let handle = defer(self.config.reply_delay(), async move {
            let _ = tx.send(AppEvent::AssistantReply { room_id, text });
        });
        self.pending_replies.push(handle);
    }

    fn assistant_reply(&mut self, room_id: &str, text: &str) {
        let in_room = self.route == Route::ChatRoom
            && self
                .current_room_id()
                .is_some_and(|current| current == room_id);
        if !in_room {
            debug!("dropping reply for {room_id}: room no longer selected");
            return;
        }
        self.store.set_is_typing(false);
        self.store.add_message(Message::text(Sender::Assistant, text));
    }

    fn cancel_pending_replies(&mut self) {
        for handle in self.pending_replies.drain(..) {
            handle.abort();
        }
    }

    // -- theme -------------------------------------------------------------

    async fn toggle_dark_mode(&mut self) -> Result<()> {
        self.store.toggle_dark_mode();
        let name = theme::stored_name(self.store.state().dark_mode);
        self.storage.put(keys::THEME, json!(name)).await?;
        Ok(())
    }

    // -- plumbing ----------------------------------------------------------

    async fn persist_chatrooms(&mut self) -> Result<()> {
        let value = serde_json::to_value(&self.store.state().chatrooms)?;
        self.storage.put(keys::CHATROOMS, value).await
    }

    async fn ensure_countries(&mut self) {
        if self.countries.is_empty() {
            self.countries = countries::load(&self.config.countries_url).await;
        }
    }

    fn current_room_id(&self) -> Option<String> {
        self.store
            .state()
            .current_chatroom
            .as_ref()
            .map(|room| room.id.clone())
    }

    fn notify(&mut self, success: bool, text: &str) {
        if success {
            info!("{text}");
        } else {
            warn!("{text}");
        }
        self.notices.push(Notice {
            success,
            text: text.to_string(),
        });
    }

    fn notify_errors(&mut self, result: &ValidationResult) {
        for message in result.errors.values() {
            self.notify(false, message);
        }
    }

    // -- read access -------------------------------------------------------

    pub fn state(&self) -> &SessionState {
        self.store.state()
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn auth(&self) -> Option<&AuthSession> {
        self.auth.as_ref()
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn search_input_value(&self) -> &str {
        &self.search_input
    }

    pub fn committed_search_term(&self) -> &str {
        &self.search_term
    }

    /// Drain accumulated notices; the UI shows each once.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
