//! Typed feature flags for launch requests.
//!
//! A request carries optional toggles (absent = disabled); merging over the
//! declared defaults yields the concrete set the rest of the launch uses.
//! Only `shortlife` has a declared default.

use serde::{Deserialize, Serialize};

/// Feature toggles as requested by a caller. Every field is optional so a
/// request only has to mention the features it cares about.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureRequest {
    /// Expire this site on the short-lived window instead of the regular one.
    pub shortlife: Option<bool>,
    /// Install and activate Jetpack.
    pub jetpack: Option<bool>,
    /// Install and activate WooCommerce.
    pub woocommerce: Option<bool>,
    /// Install and activate the Gutenberg plugin.
    pub gutenberg: Option<bool>,
    /// Install and activate the WordPress Beta Tester plugin.
    pub wordpress_beta_tester: Option<bool>,
    /// Turn on WP_DEBUG and WP_DEBUG_LOG.
    pub wp_debug_log: Option<bool>,
    /// Deny access to xmlrpc.php.
    pub block_xmlrpc: Option<bool>,
    /// Convert the site to a subdirectory-based multisite network.
    pub subdir_multisite: Option<bool>,
    /// Convert the site to a subdomain-based multisite network.
    pub subdomain_multisite: Option<bool>,
}

/// Concrete feature set after merging a request over the defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureSet {
    pub shortlife: bool,
    pub jetpack: bool,
    pub woocommerce: bool,
    pub gutenberg: bool,
    pub wordpress_beta_tester: bool,
    pub wp_debug_log: bool,
    pub block_xmlrpc: bool,
    pub subdir_multisite: bool,
    pub subdomain_multisite: bool,
}

impl FeatureRequest {
    /// Merge this request over the declared defaults. One level deep: a set
    /// field wins, an unset field takes the default (`false` everywhere,
    /// `shortlife` explicitly so).
    #[must_use]
    pub fn merge_with_defaults(&self) -> FeatureSet {
        FeatureSet {
            shortlife: self.shortlife.unwrap_or(false),
            jetpack: self.jetpack.unwrap_or(false),
            woocommerce: self.woocommerce.unwrap_or(false),
            gutenberg: self.gutenberg.unwrap_or(false),
            wordpress_beta_tester: self.wordpress_beta_tester.unwrap_or(false),
            wp_debug_log: self.wp_debug_log.unwrap_or(false),
            block_xmlrpc: self.block_xmlrpc.unwrap_or(false),
            subdir_multisite: self.subdir_multisite.unwrap_or(false),
            subdomain_multisite: self.subdomain_multisite.unwrap_or(false),
        }
    }
}

impl FeatureSet {
    /// Names of the enabled features, for logging.
    #[must_use]
    pub fn enabled_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        let mut push = |enabled: bool, name: &'static str| {
            if enabled {
                names.push(name);
            }
        };
        push(self.shortlife, "shortlife");
        push(self.jetpack, "jetpack");
        push(self.woocommerce, "woocommerce");
        push(self.gutenberg, "gutenberg");
        push(self.wordpress_beta_tester, "wordpress-beta-tester");
        push(self.wp_debug_log, "wp-debug-log");
        push(self.block_xmlrpc, "block-xmlrpc");
        push(self.subdir_multisite, "subdir-multisite");
        push(self.subdomain_multisite, "subdomain-multisite");
        names
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
