//! `sandcastle launch` — provision a new demo instance.

use anyhow::Result;
use clap::Args;
use tracing::error;

use crate::application::ports::{InstanceStore, ProviderClient, RemoteExecutor};
use crate::application::services::launch::LaunchOrchestrator;
use crate::domain::{Config, FeatureRequest};

/// Arguments for the launch command.
#[derive(Args, Debug)]
pub struct LaunchArgs {
    /// PHP version for the app runtime
    #[arg(long, default_value = "7.4")]
    pub php_version: String,

    /// Expire the instance on the short-lived window
    #[arg(long)]
    pub shortlived: bool,

    /// Install and activate Jetpack
    #[arg(long)]
    pub jetpack: bool,

    /// Install and activate WooCommerce
    #[arg(long)]
    pub woocommerce: bool,

    /// Install and activate the Gutenberg plugin
    #[arg(long)]
    pub gutenberg: bool,

    /// Install and activate the WordPress Beta Tester plugin
    #[arg(long)]
    pub wordpress_beta_tester: bool,

    /// Turn on WP_DEBUG and WP_DEBUG_LOG
    #[arg(long)]
    pub wp_debug_log: bool,

    /// Deny access to xmlrpc.php
    #[arg(long)]
    pub block_xmlrpc: bool,

    /// Convert to a subdirectory-based multisite network
    #[arg(long, conflicts_with = "subdomain_multisite")]
    pub subdir_multisite: bool,

    /// Convert to a subdomain-based multisite network
    #[arg(long)]
    pub subdomain_multisite: bool,
}

impl LaunchArgs {
    /// Map the CLI flags onto a feature request. A flag that was not passed
    /// stays unset so the merge applies the declared defaults.
    fn feature_request(&self) -> FeatureRequest {
        let toggle = |flag: bool| flag.then_some(true);
        FeatureRequest {
            shortlife: toggle(self.shortlived),
            jetpack: toggle(self.jetpack),
            woocommerce: toggle(self.woocommerce),
            gutenberg: toggle(self.gutenberg),
            wordpress_beta_tester: toggle(self.wordpress_beta_tester),
            wp_debug_log: toggle(self.wp_debug_log),
            block_xmlrpc: toggle(self.block_xmlrpc),
            subdir_multisite: toggle(self.subdir_multisite),
            subdomain_multisite: toggle(self.subdomain_multisite),
        }
    }
}

/// Run `sandcastle launch`.
///
/// # Errors
///
/// Returns a uniform "launch failed" error after logging the step that
/// failed; no partial-success result is reported.
pub async fn run(
    args: &LaunchArgs,
    config: &Config,
    provider: &impl ProviderClient,
    store: &impl InstanceStore,
    executor: &impl RemoteExecutor,
) -> Result<()> {
    let mut orchestrator = LaunchOrchestrator::new(config, provider, store, executor);
    crate::features::register_builtin(orchestrator.hooks_mut());

    match orchestrator
        .launch(&args.php_version, &args.feature_request())
        .await
    {
        Ok(instance) => {
            println!("Launched https://{}", instance.domain);
            println!("  sysuser:  {}", instance.username);
            println!("  password: {}", instance.password);
            Ok(())
        }
        Err(err) => {
            error!(%err, "launch failed");
            anyhow::bail!("launch failed")
        }
    }
}
