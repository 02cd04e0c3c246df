use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::select;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use super::application::{ApplicationId, ApplicationStatus};
use super::deploy_client::{DeployClient, StatusResult};
use super::deployment::DeploymentConfig;
use crate::storage::application_repository::ApplicationRepository;

/// One status probe against the application's forwarded status endpoint.
/// Transport and remote errors degrade to `RequestFailed` so the caller
/// retries on the next tick instead of counting a network hiccup as an
/// unhealthy deployment.
pub(crate) async fn probe_status(
    repository: &dyn ApplicationRepository,
    client: &dyn DeployClient,
    config: &DeploymentConfig,
    id: ApplicationId,
    services: &[String],
) -> StatusResult {
    let application = match repository.application(id).await {
        Ok(application) => application,
        Err(err) => {
            warn!("Status probe can't read application: '{}': {}", id, err);
            return StatusResult::RequestFailed;
        }
    };
    let status_url = config.endpoints.status_url(application.forwarding_port);
    match client.query_status(&status_url, services).await {
        Ok(response) => StatusResult::from_response(response),
        Err(err) => {
            warn!("Status query for application: '{}' failed: {}", id, err);
            StatusResult::RequestFailed
        }
    }
}

/// Background watcher driving one application from `InDeployment` to a
/// terminal status.
pub struct StatusPoller {
    id: ApplicationId,
    repository: Arc<dyn ApplicationRepository + Send + Sync>,
    client: Arc<dyn DeployClient + Send + Sync>,
    config: DeploymentConfig,
}

impl StatusPoller {
    pub fn new(
        id: ApplicationId,
        repository: Arc<dyn ApplicationRepository + Send + Sync>,
        client: Arc<dyn DeployClient + Send + Sync>,
        config: DeploymentConfig,
    ) -> Self {
        Self {
            id,
            repository,
            client,
            config,
        }
    }

    /// Polls on a fixed cadence until a terminal status is written, the
    /// token fires, or a persistence failure makes further progress
    /// unobservable. Errors never reach the caller; progress is visible
    /// only through the persisted status.
    pub async fn run(self, token: CancellationToken) {
        let mut consecutive_failures = 0u32;
        loop {
            select! {
                _ = token.cancelled() => {
                    info!("Status polling for application: '{}' cancelled.", self.id);
                    return;
                }
                _ = sleep(self.config.status_poll_interval) => {}
            }
            let result = probe_status(
                self.repository.as_ref(),
                self.client.as_ref(),
                &self.config,
                self.id,
                &self.config.services,
            )
            .await;
            debug!(
                "Deployment status probe for application: '{}': {:?}",
                self.id, result
            );
            match result {
                StatusResult::Healthy => {
                    self.finish_with(ApplicationStatus::Deployed).await;
                    return;
                }
                StatusResult::RequestFailed => continue,
                StatusResult::Unhealthy(_) => {
                    consecutive_failures += 1;
                    if consecutive_failures >= self.config.status_failure_threshold {
                        self.finish_with(ApplicationStatus::DeployFailed).await;
                        return;
                    }
                }
            }
        }
    }

    async fn finish_with(&self, status: ApplicationStatus) {
        match self
            .repository
            .update_status_if(self.id, ApplicationStatus::InDeployment, status)
            .await
        {
            Ok(true) => info!("Application: '{}' reached status: {:?}.", self.id, status),
            Ok(false) => warn!(
                "Application: '{}' left 'InDeployment' before polling finished; keeping the stored status.",
                self.id
            ),
            Err(err) => error!(
                "Can't persist terminal status for application: '{}': {}",
                self.id, err
            ),
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use std::time::Duration;

    use mockall::predicate::eq;
    use mockall::Sequence;
    use provider_api::StatusResponse;
    use tokio_util::sync::CancellationToken;

    use super::StatusPoller;
    use crate::managers::application::ApplicationStatus;
    use crate::managers::deploy_client::DeployClientError;
    use crate::storage::application_repository::RepositoryError;
    use crate::utils::test_utilities::{
        create_example_application, create_example_config, MockApplicationRepository,
        MockDeployClient, EXAMPLE_APPLICATION_ID,
    };

    #[tokio::test]
    async fn healthy_result_marks_application_deployed() {
        let client = create_client_returning(vec![Ok(StatusResponse { result: 1 })]);
        let repository = create_repository_expecting(ApplicationStatus::Deployed, Ok(true));
        run_poller(repository, client).await;
    }

    #[tokio::test]
    async fn third_unhealthy_result_marks_application_failed() {
        let client = create_client_returning(vec![
            Ok(StatusResponse { result: 2 }),
            Ok(StatusResponse { result: 2 }),
            Ok(StatusResponse { result: 2 }),
        ]);
        let repository = create_repository_expecting(ApplicationStatus::DeployFailed, Ok(true));
        run_poller(repository, client).await;
    }

    #[tokio::test]
    async fn request_failures_never_count_as_unhealthy() {
        let mut results: Vec<Result<StatusResponse, DeployClientError>> = (0..100)
            .map(|_| {
                Err(DeployClientError::Transport(String::from(
                    "connection refused",
                )))
            })
            .collect();
        results.push(Ok(StatusResponse { result: 1 }));
        let client = create_client_returning(results);
        let repository = create_repository_expecting(ApplicationStatus::Deployed, Ok(true));
        run_poller(repository, client).await;
    }

    #[tokio::test]
    async fn request_failures_between_unhealthy_results_do_not_reset_the_bound() {
        let client = create_client_returning(vec![
            Ok(StatusResponse { result: 2 }),
            Err(DeployClientError::Transport(String::from("timeout"))),
            Ok(StatusResponse { result: 0 }),
            Ok(StatusResponse { result: 2 }),
        ]);
        let repository = create_repository_expecting(ApplicationStatus::DeployFailed, Ok(true));
        run_poller(repository, client).await;
    }

    #[tokio::test]
    async fn cancelled_poller_makes_no_probes_and_no_writes() {
        let mut config = create_example_config();
        config.status_poll_interval = Duration::from_secs(60);
        let poller = StatusPoller::new(
            EXAMPLE_APPLICATION_ID,
            Arc::new(MockApplicationRepository::new()),
            Arc::new(MockDeployClient::new()),
            config,
        );
        let token = CancellationToken::new();
        token.cancel();
        poller.run(token).await;
    }

    #[tokio::test]
    async fn poller_stops_when_terminal_write_fails() {
        let client = create_client_returning(vec![Ok(StatusResponse { result: 1 })]);
        let repository = create_repository_expecting(
            ApplicationStatus::Deployed,
            Err(RepositoryError::UpdateFail(String::from("storage gone"))),
        );
        run_poller(repository, client).await;
    }

    #[tokio::test]
    async fn poller_stops_when_the_status_guard_no_longer_matches() {
        let client = create_client_returning(vec![Ok(StatusResponse { result: 1 })]);
        let repository = create_repository_expecting(ApplicationStatus::Deployed, Ok(false));
        run_poller(repository, client).await;
    }

    async fn run_poller(repository: MockApplicationRepository, client: MockDeployClient) {
        let mut config = create_example_config();
        config.status_poll_interval = Duration::ZERO;
        let poller = StatusPoller::new(
            EXAMPLE_APPLICATION_ID,
            Arc::new(repository),
            Arc::new(client),
            config,
        );
        poller.run(CancellationToken::new()).await;
    }

    fn create_client_returning(
        results: Vec<Result<StatusResponse, DeployClientError>>,
    ) -> MockDeployClient {
        let mut client = MockDeployClient::new();
        let mut sequence = Sequence::new();
        for result in results {
            client
                .expect_query_status()
                .times(1)
                .in_sequence(&mut sequence)
                .return_once(move |_, _| result);
        }
        client
    }

    fn create_repository_expecting(
        status: ApplicationStatus,
        write_result: Result<bool, RepositoryError>,
    ) -> MockApplicationRepository {
        let mut repository = MockApplicationRepository::new();
        repository
            .expect_application()
            .returning(|_| Ok(create_example_application()));
        repository
            .expect_update_status_if()
            .with(
                eq(EXAMPLE_APPLICATION_ID),
                eq(ApplicationStatus::InDeployment),
                eq(status),
            )
            .times(1)
            .return_once(move |_, _, _| write_result);
        repository
    }
}
