pub mod deployment_fabric;
