pub mod provider_client_handler;
