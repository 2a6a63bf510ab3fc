use dnsgate_application::use_cases::ApplyControlCommandUseCase;
use dnsgate_domain::ControlConfig;
use dnsgate_infrastructure::control::ControlChannelServer;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub fn start_control_server(
    config: &ControlConfig,
    apply_command: Arc<ApplyControlCommandUseCase>,
    shutdown: CancellationToken,
) -> anyhow::Result<JoinHandle<()>> {
    let server = ControlChannelServer::bind(config.endpoint(), apply_command)?;
    Ok(tokio::spawn(server.run(shutdown)))
}
