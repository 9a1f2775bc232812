pub(crate) mod preview_session;
