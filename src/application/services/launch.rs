//! Application service — the end-to-end instance launch workflow.
//!
//! Imports only from `crate::domain` and `crate::application::ports`. All
//! I/O is routed through injected port implementations.

use chrono::Utc;
use rand::Rng;
use tracing::{debug, warn};

use crate::application::ports::{
    App, InstanceStore, LaunchContext, LaunchHooks, ProviderClient, RemoteExecutor, SystemUser,
};
use crate::domain::error::LaunchError;
use crate::domain::{
    CommandPipeline, Config, FeatureRequest, FeatureSet, NewInstance, WordpressOptions,
    full_domain, main_domain, names, slug,
};

/// How many subdomain candidates to try before giving up on uniqueness and
/// proceeding with the last one.
const COLLISION_ATTEMPTS: usize = 10;

/// Extra numeric suffix appended to short-lived subdomains.
const SHORTLIFE_SUFFIX: std::ops::RangeInclusive<u32> = 2..=500;

/// Username for the generated WordPress admin account.
const ADMIN_USER: &str = "demo";

/// Stock site title when subdomain-based titles are disabled.
const DEFAULT_SITE_TITLE: &str = "My WordPress Site";

/// `.htaccess` template for regular (non-multisite) sites.
const HTACCESS_TEMPLATE_URL: &str =
    "https://gist.githubusercontent.com/oskosk/0dab794274742af9caddefbc73f0ad80/raw/504f60da86969a9d55487f0c4821d06928a97218/.htaccess";

/// Companion plugin that performs the first-visit auto-login.
const COMPANION_PLUGIN_URL: &str =
    "https://github.com/Automattic/companion/archive/master.zip";

/// Everything a successful launch reports back to the caller.
#[derive(Debug, Clone)]
pub struct LaunchedInstance {
    /// The app as the provider reported it.
    pub app: App,
    /// Fully-qualified domain of the new instance.
    pub domain: String,
    /// Backend system user the app runs under.
    pub username: String,
    /// Generated admin/SSH password.
    pub password: String,
}

/// Drives the launch workflow: name generation with collision retry, remote
/// provisioning, registry insert, feature command composition, and one
/// remote execution. Owns the extension-point registry.
pub struct LaunchOrchestrator<'a, P, S, X> {
    config: &'a Config,
    provider: &'a P,
    store: &'a S,
    executor: &'a X,
    hooks: LaunchHooks,
}

impl<'a, P, S, X> LaunchOrchestrator<'a, P, S, X>
where
    P: ProviderClient,
    S: InstanceStore,
    X: RemoteExecutor,
{
    /// Create an orchestrator with an empty extension-point registry.
    /// Callers wire in feature registrations through [`Self::hooks_mut`].
    pub fn new(config: &'a Config, provider: &'a P, store: &'a S, executor: &'a X) -> Self {
        Self {
            config,
            provider,
            store,
            executor,
            hooks: LaunchHooks::new(),
        }
    }

    /// The extension-point registry, for collaborators that want to veto
    /// feature combinations or inject extra remote commands.
    pub fn hooks_mut(&mut self) -> &mut LaunchHooks {
        &mut self.hooks
    }

    /// Launch a new instance.
    ///
    /// On success the instance is provisioned, recorded, and configured. A
    /// provisioning failure aborts before any registry write; a remote
    /// execution failure is reported as a failed launch even though the app
    /// and registry row already exist.
    ///
    /// # Errors
    ///
    /// Returns a [`LaunchError`] naming the step that failed.
    pub async fn launch(
        &self,
        php_version: &str,
        requested: &FeatureRequest,
    ) -> Result<LaunchedInstance, LaunchError> {
        let mut rng = rand::thread_rng();

        // 1. Merge the request over the declared defaults.
        let features = requested.merge_with_defaults();

        // 2. Let collaborators veto the merged set before any side effect.
        self.hooks
            .check_conditions(&features)
            .map_err(LaunchError::FeatureCondition)?;

        // 3. Credentials for the system user and the admin account.
        let password = names::generate_password(&mut rng);

        // 4. Pick a subdomain, retrying on collision.
        let subdomain = self.pick_subdomain(&mut rng, &features);
        let domain = full_domain(&subdomain, &self.config.domain);

        // 5. Site title, from the subdomain or the stock default.
        let site_title = if self.config.use_subdomain_based_wordpress_title {
            slug::title_case(&subdomain)
        } else {
            DEFAULT_SITE_TITLE.to_string()
        };
        let options = WordpressOptions {
            site_title,
            admin_user: ADMIN_USER.to_string(),
            admin_password: password.clone(),
            admin_email: self.config.default_admin_email_address.clone(),
        };

        debug!(
            %domain,
            features = %features.enabled_names().join(", "),
            "launching instance"
        );

        // 6. Backend system user. Failure aborts with nothing persisted.
        debug!(%domain, "creating sysuser");
        let user = self
            .provider
            .create_system_user(&names::generate_username(&mut rng), &password)
            .map_err(LaunchError::UserCreation)?;

        // 7. The app itself. Failure aborts before any registry write, so a
        //    failed app creation never leaves an orphaned instance row. The
        //    system user may leak; the purge engine never touches users it
        //    has no row for.
        debug!(%domain, sysuser = %user.name, "creating app");
        let app = self
            .provider
            .create_app(&user, php_version, &domain, &options, &features)
            .map_err(LaunchError::AppCreation)?;

        // 8. Record the instance. A registry failure here is logged and the
        //    launch continues; the site exists and is still configurable.
        let domain = main_domain(&app.domains).unwrap_or(&domain).to_string();
        let record = NewInstance {
            username: user.name.clone(),
            domain: domain.clone(),
            created: Utc::now(),
            shortlived: features.shortlife,
        };
        if let Err(err) = self.store.insert(&record) {
            warn!(%domain, %err, "failed to record instance");
        }

        // 9–11. Assemble the remote command pipeline: feature contributions,
        // then the built-in .htaccess and auto-login bootstraps, then the
        // post-auto-login contributions.
        let ctx = LaunchContext {
            domain: &domain,
            sysuser: &user.name,
            password: &password,
            features: &features,
        };
        let mut pipeline = CommandPipeline::new();
        self.hooks.run_before_auto_login(&ctx, &mut pipeline);

        debug!(%domain, "adding .htaccess bootstrap");
        pipeline.push_fragment(htaccess_bootstrap());
        debug!(%domain, "adding auto-login bootstrap");
        pipeline.push_fragment(auto_login_bootstrap(
            &ctx,
            &self.config.companion_api_base_url,
        ));

        self.hooks.run_after_auto_login(&ctx, &mut pipeline);

        // 12. One remote session runs the whole composed chain.
        self.run_remote_commands(&user, &password, &domain, &pipeline)
            .await?;

        debug!(%domain, "finished launching");
        Ok(LaunchedInstance {
            app,
            domain,
            username: user.name,
            password,
        })
    }

    /// Generate subdomain candidates until one is free or the attempts run
    /// out. Exhaustion is not fatal: the last candidate is used and the race
    /// is surfaced to the caller as a rare duplicate-domain failure instead.
    fn pick_subdomain(&self, rng: &mut impl Rng, features: &FeatureSet) -> String {
        let mut subdomain = String::new();
        for attempt in 1..=COLLISION_ATTEMPTS {
            subdomain =
                names::generate_subdomain(rng, self.config.use_alliterations_for_subdomain);
            if features.shortlife {
                // Extra randomness namespaces short-lived instances and cuts
                // collision probability.
                subdomain = format!("{subdomain}-{}", rng.gen_range(SHORTLIFE_SUFFIX));
            }
            let candidate = full_domain(&subdomain, &self.config.domain);
            match self.store.domain_in_use(&candidate) {
                Ok(false) => return subdomain,
                Ok(true) => debug!(%candidate, attempt, "subdomain collision"),
                Err(err) => {
                    warn!(%candidate, %err, "collision check failed, assuming candidate is free");
                    return subdomain;
                }
            }
        }
        warn!(
            %subdomain,
            attempts = COLLISION_ATTEMPTS,
            "all subdomain candidates collided, proceeding with the last one"
        );
        subdomain
    }

    async fn run_remote_commands(
        &self,
        user: &SystemUser,
        password: &str,
        domain: &str,
        pipeline: &CommandPipeline,
    ) -> Result<(), LaunchError> {
        let initial = format!("cd ~/apps/{}/public", user.name);
        let command = pipeline.compose(&initial);
        debug!(%domain, %command, "running feature commands");

        let result = self
            .executor
            .run_remote(&user.name, password, &command)
            .await
            .map_err(|err| LaunchError::RemoteExecution {
                detail: format!("{err:#}"),
            })?;
        if !result.success() {
            debug!(
                %domain,
                exit_code = result.exit_code,
                output = %result.output,
                "remote commands failed"
            );
            return Err(LaunchError::RemoteExecution {
                detail: format!("exit code {}: {}", result.exit_code, result.output),
            });
        }
        debug!(%domain, "remote commands ran OK");
        Ok(())
    }
}

/// Fetch the `.htaccess` template and set up pretty permalinks.
fn htaccess_bootstrap() -> String {
    format!(
        "wget '{HTACCESS_TEMPLATE_URL}' -O .htaccess \
         && wp rewrite structure '/%year%/%monthnum%/%day%/%postname%/' \
         && wp rewrite flush"
    )
}

/// Wire the companion plugin so the creator is logged in on first visit.
fn auto_login_bootstrap(ctx: &LaunchContext<'_>, companion_api_base_url: &str) -> String {
    format!(
        "wp option add auto_login 1 \
         && wp option add sandcastle_sysuser '{sysuser}' \
         && wp option add sandcastle_admin_password '{password}' \
         && wp option add companion_api_base_url '{companion_api_base_url}' \
         && wp plugin install --force {COMPANION_PLUGIN_URL} --activate",
        sysuser = ctx.sysuser,
        password = ctx.password,
    )
}

// ── Unit tests ───────────────────────────────────────────────────────────────
