use crate::model::{Chatroom, Message};

/// The whole client-side state tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub chatrooms: Vec<Chatroom>,
    pub current_chatroom: Option<Chatroom>,
    pub messages: Vec<Message>,
    pub is_loading: bool,
    pub is_typing: bool,
    pub dark_mode: bool,
}

/// Owns `SessionState`. Mutation happens only through the named transitions
/// below; every transition is total, synchronous and free of I/O and
/// validation — those concerns belong to the caller.
///
/// Constructed once at startup and passed by reference; there is no hidden
/// module-level instance.
#[derive(Debug)]
pub struct ChatStore {
    state: SessionState,
}

impl ChatStore {
    pub fn new(dark_mode: bool) -> Self {
        Self {
            state: SessionState {
                dark_mode,
                ..SessionState::default()
            },
        }
    }

    /// Read access for the UI layer. Callers get a shared view, never a
    /// handle they can mutate.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Replace the chatroom list wholesale (initial load from storage).
    pub fn set_chatrooms(&mut self, list: Vec<Chatroom>) {
        self.state.chatrooms = list;
    }

    /// Append a room, preserving insertion order. Duplicate ids are a caller
    /// error and are not guarded here.
    pub fn add_chatroom(&mut self, room: Chatroom) {
        self.state.chatrooms.push(room);
    }

    /// Remove the room with the given id. No-op when absent.
    pub fn remove_chatroom(&mut self, id: &str) {
        self.state.chatrooms.retain(|room| room.id != id);
    }

    pub fn set_current_chatroom(&mut self, room: Option<Chatroom>) {
        self.state.current_chatroom = room;
    }

    /// Replace the message list wholesale.
    pub fn set_messages(&mut self, list: Vec<Message>) {
        self.state.messages = list;
    }

    /// Append a message. The list is append-only; there is no edit or delete.
    pub fn add_message(&mut self, message: Message) {
        self.state.messages.push(message);
    }

    pub fn set_is_loading(&mut self, value: bool) {
        self.state.is_loading = value;
    }

    pub fn set_is_typing(&mut self, value: bool) {
        self.state.is_typing = value;
    }

    pub fn set_dark_mode(&mut self, value: bool) {
        self.state.dark_mode = value;
    }

    pub fn toggle_dark_mode(&mut self) {
        self.state.dark_mode = !self.state.dark_mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sender;

    #[test]
    fn add_then_remove_restores_sequence() {
        let mut store = ChatStore::new(false);
        store.add_chatroom(Chatroom::new("General Chat"));
        store.add_chatroom(Chatroom::new("Project Discussion"));
        let before = store.state().chatrooms.clone();

        let extra = Chatroom::new("Scratch");
        let id = extra.id.clone();
        store.add_chatroom(extra);
        assert_eq!(store.state().chatrooms.len(), 3);
        store.remove_chatroom(&id);
        assert_eq!(store.state().chatrooms, before);
    }

    #[test]
    fn remove_missing_id_is_noop() {
        let mut store = ChatStore::new(false);
        store.add_chatroom(Chatroom::new("General Chat"));
        let before = store.state().chatrooms.clone();
        store.remove_chatroom("no-such-id");
        assert_eq!(store.state().chatrooms, before);
    }

    #[test]
    fn set_chatrooms_replaces_wholesale() {
        let mut store = ChatStore::new(false);
        store.add_chatroom(Chatroom::new("Old"));
        let fresh = vec![Chatroom::new("A"), Chatroom::new("B")];
        store.set_chatrooms(fresh.clone());
        assert_eq!(store.state().chatrooms, fresh);
    }

    #[test]
    fn messages_append_in_order() {
        let mut store = ChatStore::new(false);
        store.add_message(Message::text(Sender::User, "first"));
        store.add_message(Message::text(Sender::Assistant, "second"));
        assert_eq!(store.state().messages.len(), 2);
        assert_eq!(store.state().messages[0].text_content(), Some("first"));
        store.set_messages(Vec::new());
        assert!(store.state().messages.is_empty());
    }

    #[test]
    fn toggle_dark_mode_twice_restores() {
        for initial in [false, true] {
            let mut store = ChatStore::new(initial);
            store.toggle_dark_mode();
            assert_eq!(store.state().dark_mode, !initial);
            store.toggle_dark_mode();
            assert_eq!(store.state().dark_mode, initial);
        }
    }

    #[test]
    fn flags_replace() {
        let mut store = ChatStore::new(false);
        store.set_is_loading(true);
        store.set_is_typing(true);
        assert!(store.state().is_loading);
        assert!(store.state().is_typing);
        store.set_is_loading(false);
        assert!(!store.state().is_loading);
    }

    #[test]
    fn current_chatroom_replaces() {
        let mut store = ChatStore::new(false);
        let room = Chatroom::new("General Chat");
        store.set_current_chatroom(Some(room.clone()));
        assert_eq!(store.state().current_chatroom.as_ref(), Some(&room));
        store.set_current_chatroom(None);
        assert!(store.state().current_chatroom.is_none());
    }
}
