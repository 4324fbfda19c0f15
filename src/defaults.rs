//! Built-in default preferences
//!
//! Every generated profile starts from the common table plus the table for
//! its [`BrowserKind`]. The tables quiet everything a browser does on its own
//! at startup (update checks, first-run pages, telemetry, safe-browsing
//! downloads) and relax addon signing and compatibility checks so a test
//! addon loads without prompts.
//!
//! Tables are built once on first use and shared read-only afterwards.

use crate::types::{BrowserKind, PrefValue, Preferences};
use std::sync::OnceLock;

static COMMON_PREFS: OnceLock<Preferences> = OnceLock::new();
static FIREFOX_PREFS: OnceLock<Preferences> = OnceLock::new();
static THUNDERBIRD_PREFS: OnceLock<Preferences> = OnceLock::new();
static FENNEC_PREFS: OnceLock<Preferences> = OnceLock::new();

/// Defaults applied to every profile regardless of browser kind
pub fn common_defaults() -> &'static Preferences {
    COMMON_PREFS.get_or_init(|| {
        table([
            ("app.update.enabled", false.into()),
            ("app.update.auto", false.into()),
            ("app.update.staging.enabled", false.into()),
            ("app.update.url.android", "".into()),
            ("app.releaseNotesURL", "http://localhost/app-dummy/".into()),
            ("app.vendorURL", "http://localhost/app-dummy/".into()),
            ("browser.dom.window.dump.enabled", true.into()),
            ("browser.safebrowsing.enabled", false.into()),
            ("browser.safebrowsing.malware.enabled", false.into()),
            ("browser.safebrowsing.provider.google.gethashURL", "http://localhost/safebrowsing-dummy/gethash".into()),
            ("browser.safebrowsing.provider.google.updateURL", "http://localhost/safebrowsing-dummy/update".into()),
            ("browser.search.update", false.into()),
            ("browser.startup.homepage_override.mstone", "ignore".into()),
            ("datareporting.healthreport.service.enabled", false.into()),
            ("datareporting.healthreport.uploadEnabled", false.into()),
            ("datareporting.policy.dataSubmissionEnabled", false.into()),
            ("devtools.chrome.enabled", true.into()),
            ("devtools.debugger.remote-enabled", true.into()),
            ("devtools.errorconsole.enabled", true.into()),
            ("extensions.autoDisableScopes", PrefValue::Integer(10)),
            ("extensions.blocklist.enabled", false.into()),
            ("extensions.checkCompatibility.nightly", false.into()),
            ("extensions.enabledScopes", PrefValue::Integer(5)),
            ("extensions.getAddons.cache.enabled", false.into()),
            ("extensions.installDistroAddons", false.into()),
            ("extensions.sdk.console.logLevel", "info".into()),
            ("extensions.showMismatchUI", false.into()),
            ("extensions.strictCompatibility", false.into()),
            ("extensions.update.enabled", false.into()),
            ("extensions.update.notifyUser", false.into()),
            ("lightweightThemes.update.enabled", false.into()),
            ("toolkit.telemetry.enabled", false.into()),
            ("toolkit.telemetry.prompted", PrefValue::Integer(2)),
            ("toolkit.telemetry.rejected", true.into()),
            ("xpinstall.signatures.required", false.into()),
        ])
    })
}

/// Defaults specific to one browser kind
pub fn browser_defaults(kind: BrowserKind) -> &'static Preferences {
    match kind {
        BrowserKind::Firefox => FIREFOX_PREFS.get_or_init(|| {
            table([
                ("browser.EULA.override", true.into()),
                ("browser.link.open_newwindow", PrefValue::Integer(2)),
                ("browser.reader.detectedFirstArticle", true.into()),
                ("browser.sessionstore.resume_from_crash", false.into()),
                ("browser.shell.checkDefaultBrowser", false.into()),
                ("browser.startup.homepage", "about:blank".into()),
                ("browser.startup.page", PrefValue::Integer(0)),
                ("browser.tabs.warnOnClose", false.into()),
                ("browser.tabs.warnOnOpen", false.into()),
                ("browser.uitour.enabled", false.into()),
                ("browser.warnOnQuit", false.into()),
                ("devtools.browsertoolbox.panel", "jsdebugger".into()),
                ("dom.disable_open_during_load", false.into()),
                ("dom.max_chrome_script_run_time", PrefValue::Integer(0)),
                ("dom.max_script_run_time", PrefValue::Integer(0)),
                ("startup.homepage_welcome_url", "about:blank".into()),
            ])
        }),
        BrowserKind::Thunderbird => THUNDERBIRD_PREFS.get_or_init(|| {
            table([
                ("mail.account.manager.showAccountCentral", false.into()),
                ("mail.provider.enabled", false.into()),
                ("mail.shell.checkDefaultClient", false.into()),
                ("mail.startup.enabledMailCheckOnce", true.into()),
                ("mail.winsearch.firstRunDone", true.into()),
                ("mailnews.start_page.enabled", false.into()),
                ("mailnews.start_page_override.mstone", "ignore".into()),
                ("messenger.startup.action", PrefValue::Integer(0)),
            ])
        }),
        BrowserKind::Fennec => FENNEC_PREFS.get_or_init(|| {
            table([
                ("browser.console.showInPanel", true.into()),
                ("browser.firstrun.show.uidiscovery", false.into()),
                ("browser.firstrun.show.localepicker", false.into()),
                ("browser.snippets.enabled", false.into()),
            ])
        }),
    }
}

/// Alias of [`browser_defaults`], named after its role in profile assembly
pub fn defaults_for(kind: BrowserKind) -> &'static Preferences {
    browser_defaults(kind)
}

fn table<const N: usize>(entries: [(&str, PrefValue); N]) -> Preferences {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_have_no_duplicate_keys() {
        // A duplicate in a literal table would silently collapse on collect
        assert_eq!(common_defaults().len(), 35);
        assert_eq!(browser_defaults(BrowserKind::Firefox).len(), 16);
        assert_eq!(browser_defaults(BrowserKind::Thunderbird).len(), 8);
        assert_eq!(browser_defaults(BrowserKind::Fennec).len(), 4);
    }

    #[test]
    fn test_tables_are_shared() {
        let first = common_defaults() as *const Preferences;
        let second = common_defaults() as *const Preferences;
        assert_eq!(first, second);
        assert!(std::ptr::eq(
            defaults_for(BrowserKind::Firefox),
            browser_defaults(BrowserKind::Firefox)
        ));
    }

    #[test]
    fn test_known_values_are_typed() {
        let common = common_defaults();
        assert_eq!(common["extensions.enabledScopes"], PrefValue::Integer(5));
        assert_eq!(common["app.update.enabled"], PrefValue::Bool(false));
        assert_eq!(
            common["extensions.sdk.console.logLevel"],
            PrefValue::String("info".to_string())
        );

        let firefox = browser_defaults(BrowserKind::Firefox);
        assert_eq!(
            firefox["browser.startup.homepage"],
            PrefValue::String("about:blank".to_string())
        );
    }

    #[test]
    fn test_browser_tables_differ() {
        assert!(browser_defaults(BrowserKind::Thunderbird)
            .contains_key("mail.shell.checkDefaultClient"));
        assert!(!browser_defaults(BrowserKind::Firefox)
            .contains_key("mail.shell.checkDefaultClient"));
        assert!(browser_defaults(BrowserKind::Fennec).contains_key("browser.console.showInPanel"));
    }
}
