//! Built-in launch features.
//!
//! Each feature registers against the orchestrator's extension points and
//! contributes remote command fragments when its toggle is enabled in the
//! launch's merged feature set. Registration order fixes execution order.

use crate::application::ports::LaunchHooks;

/// `.htaccess` template for subdirectory-based multisite networks.
const SUBDIR_MULTISITE_HTACCESS_TEMPLATE_URL: &str =
    "https://gist.githubusercontent.com/oskosk/f5febd1bb65a2ace3d35feac949b47fd/raw/6ea8ffa013056f6793d3e8775329ec74d3304835/gistfile1.txt";

/// `.htaccess` template for subdomain-based multisite networks.
const SUBDOMAIN_MULTISITE_HTACCESS_TEMPLATE_URL: &str =
    "https://gist.githubusercontent.com/oskosk/8cac852c793df5e4946463e2e55dfdd6/raw/a60ce4122a69c1dd36c623c9b999c36c9c8d3db8/gistfile1.txt";

/// Register every built-in feature.
pub fn register_builtin(hooks: &mut LaunchHooks) {
    register_multisite(hooks);
    register_plugins(hooks);
    register_wp_debug_log(hooks);
    register_block_xmlrpc(hooks);
}

/// Multisite conversion. The two network layouts are mutually exclusive, so
/// this also registers the condition check that rejects requesting both.
fn register_multisite(hooks: &mut LaunchHooks) {
    hooks.on_feature_conditions(|features| {
        if features.subdir_multisite && features.subdomain_multisite {
            return Err(
                "subdir-multisite and subdomain-multisite cannot be combined".to_string(),
            );
        }
        Ok(())
    });
    hooks.before_auto_login(|ctx, pipeline| {
        if ctx.features.subdir_multisite {
            pipeline.push_fragment(format!(
                "wp core multisite-convert \
                 && wget '{SUBDIR_MULTISITE_HTACCESS_TEMPLATE_URL}' -O .htaccess"
            ));
        }
        if ctx.features.subdomain_multisite {
            pipeline.push_fragment(format!(
                "wp core multisite-convert --subdomains \
                 && wget '{SUBDOMAIN_MULTISITE_HTACCESS_TEMPLATE_URL}' -O .htaccess"
            ));
        }
    });
}

/// Plain plugin installs: one fragment per enabled plugin feature.
fn register_plugins(hooks: &mut LaunchHooks) {
    hooks.before_auto_login(|ctx, pipeline| {
        if ctx.features.jetpack {
            pipeline.push_fragment("wp plugin install jetpack --activate");
        }
        if ctx.features.woocommerce {
            pipeline.push_fragment("wp plugin install woocommerce --activate");
        }
        if ctx.features.gutenberg {
            pipeline.push_fragment("wp plugin install gutenberg --activate");
        }
        if ctx.features.wordpress_beta_tester {
            pipeline.push_fragment("wp plugin install wordpress-beta-tester --activate");
        }
    });
}

/// Turn on debug logging in wp-config.php.
fn register_wp_debug_log(hooks: &mut LaunchHooks) {
    hooks.before_auto_login(|ctx, pipeline| {
        if ctx.features.wp_debug_log {
            pipeline.push_fragment(
                "wp config set WP_DEBUG true --raw && wp config set WP_DEBUG_LOG true --raw",
            );
        }
    });
}

/// Deny access to xmlrpc.php. Runs after the auto-login wiring so the
/// `.htaccess` bootstrap cannot clobber the appended rule.
fn register_block_xmlrpc(hooks: &mut LaunchHooks) {
    hooks.after_auto_login(|ctx, pipeline| {
        if ctx.features.block_xmlrpc {
            pipeline.push_fragment(
                "printf '\\n<Files xmlrpc.php>\\norder deny,allow\\ndeny from all\\n</Files>\\n' \
                 >> .htaccess",
            );
        }
    });
}

// ── Unit tests ───────────────────────────────────────────────────────────────
