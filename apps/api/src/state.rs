use seatrelay_application::RelayService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub relay_service: RelayService,
}
