// Application state for HTTP handlers
use crate::application::chat_service::ChatService;
use crate::application::contact_service::ContactService;
use crate::application::dashboard_service::DashboardService;
use crate::application::simulation_service::SimulationReader;

#[derive(Clone)]
pub struct AppState {
    pub simulation: SimulationReader,
    pub dashboard_service: DashboardService,
    pub chat_service: ChatService,
    pub contact_service: ContactService,
}
