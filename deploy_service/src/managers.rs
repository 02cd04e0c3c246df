pub mod account;
pub mod application;
pub mod deploy_client;
pub mod deployment;
pub mod deployment_manager;
pub mod peer_link;
pub mod peer_link_handler;
pub mod peer_network;
pub mod status_poller;
pub mod wallet;
