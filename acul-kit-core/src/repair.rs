//! Best-effort textual patches for known breakages in upstream example code.
//!
//! Every repair checks its own precondition on the text and returns `None`
//! when there is nothing to do, so running [`repair`] on its own output is a
//! no-op. A repair that does not apply is skipped; nothing here can fail.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::extract::Sample;
use crate::screens::pascal_case;

static REACT_HOOK_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"import React, \{([^}]+)\} from ['"]react['"]"#)
        .expect("react import pattern is valid")
});

static ACTIVE_IDENTIFIERS_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bgetActiveIdentifiers\(").expect("identifier call pattern is valid")
});

const PLAIN_REACT_IMPORT: &str = "import React from 'react'";

const LOGIN_IDENTIFIERS_CALL: &str = "loginManager.getLoginIdentifiers()";
const LOGIN_IDENTIFIERS_FALLBACK: &str =
    "(loginManager.getLoginIdentifiers?.() ?? loginManager.getActiveIdentifiers?.() ?? ['email'])";

const SIGNUP_IDENTIFIERS_CALL: &str = "signupManager.getEnabledIdentifiers()";
const SIGNUP_IDENTIFIERS_FALLBACK: &str =
    "(signupManager.getEnabledIdentifiers?.() ?? [{ type: 'email', required: true }, { type: 'username', required: false }, { type: 'phone', required: false }])";

const CAPTCHA_IMPORT_TYPO: &str = "@auth0/auth0-acul-js/intersitial-captcha";
const CAPTCHA_IMPORT: &str = "@auth0/auth0-acul-js/interstitial-captcha";

const UNDEFINED_CONNECTION: &str = "const selectedConnection = alternateConnections[0];";
const TRANSACTION_CONNECTION: &str =
    "const selectedConnection = loginIdManager.transaction.alternateConnections[0];";

/// SDK utility examples that are published next to the screens but render nothing.
const UTILITY_EXAMPLES: &[&str] = &["get-current-screen-options", "get-current-theme-options"];

enum Scope {
    Every,
    Screen(&'static str),
    Screens(&'static [&'static str]),
}

impl Scope {
    fn covers(&self, screen_id: &str) -> bool {
        match self {
            Scope::Every => true,
            Scope::Screen(id) => *id == screen_id,
            Scope::Screens(ids) => ids.contains(&screen_id),
        }
    }
}

struct Repair {
    name: &'static str,
    scope: Scope,
    apply: fn(&str, &str) -> Option<String>,
}

const REPAIRS: &[Repair] = &[
    Repair {
        name: "normalise-component",
        scope: Scope::Every,
        apply: normalise_component,
    },
    Repair {
        name: "rename-active-identifiers",
        scope: Scope::Every,
        apply: rename_active_identifiers,
    },
    Repair {
        name: "login-identifiers-fallback",
        scope: Scope::Every,
        apply: login_identifiers_fallback,
    },
    Repair {
        name: "signup-identifiers-fallback",
        scope: Scope::Every,
        apply: signup_identifiers_fallback,
    },
    Repair {
        name: "captcha-import-path",
        scope: Scope::Screen("interstitial-captcha"),
        apply: captcha_import_path,
    },
    Repair {
        name: "login-id-alternate-connections",
        scope: Scope::Screen("login-id"),
        apply: login_id_alternate_connections,
    },
    Repair {
        name: "mfa-push-welcome-import",
        scope: Scope::Screen("mfa-push-welcome"),
        apply: doubled_import_keyword,
    },
    Repair {
        name: "utility-example-placeholder",
        scope: Scope::Screens(UTILITY_EXAMPLES),
        apply: utility_example_placeholder,
    },
];

/// Turn an extracted sample into the final `.tsx` source for `screen_id`.
pub fn repair(sample: &Sample, screen_id: &str) -> String {
    repair_source(&sample.code, screen_id)
}

/// [`repair`] over raw text; also used to re-check files already on disk.
pub fn repair_source(code: &str, screen_id: &str) -> String {
    let mut code = code.to_string();
    for repair in REPAIRS.iter().filter(|r| r.scope.covers(screen_id)) {
        if let Some(fixed) = (repair.apply)(&code, screen_id) {
            debug!(screen = screen_id, repair = repair.name, "Applied sample repair");
            code = fixed;
        }
    }
    code
}

fn replace_all_if_present(code: &str, from: &str, to: &str) -> Option<String> {
    code.contains(from).then(|| code.replace(from, to))
}

fn login_identifiers_fallback(code: &str, _screen_id: &str) -> Option<String> {
    replace_all_if_present(code, LOGIN_IDENTIFIERS_CALL, LOGIN_IDENTIFIERS_FALLBACK)
}

fn signup_identifiers_fallback(code: &str, _screen_id: &str) -> Option<String> {
    replace_all_if_present(code, SIGNUP_IDENTIFIERS_CALL, SIGNUP_IDENTIFIERS_FALLBACK)
}

fn captcha_import_path(code: &str, _screen_id: &str) -> Option<String> {
    replace_all_if_present(code, CAPTCHA_IMPORT_TYPO, CAPTCHA_IMPORT)
}

fn login_id_alternate_connections(code: &str, _screen_id: &str) -> Option<String> {
    replace_all_if_present(code, UNDEFINED_CONNECTION, TRANSACTION_CONNECTION)
}

fn doubled_import_keyword(code: &str, _screen_id: &str) -> Option<String> {
    code.strip_prefix("iimport").map(|rest| format!("import{rest}"))
}

fn utility_example_placeholder(code: &str, screen_id: &str) -> Option<String> {
    let placeholder = utility_placeholder(screen_id);
    (code != placeholder).then_some(placeholder)
}

fn rename_active_identifiers(code: &str, _screen_id: &str) -> Option<String> {
    ACTIVE_IDENTIFIERS_CALL
        .is_match(code)
        .then(|| ACTIVE_IDENTIFIERS_CALL.replace_all(code, "getLoginIdentifiers(").into_owned())
}

/// Fragments become a default-exported component; `useMemo` users get it imported.
fn normalise_component(code: &str, screen_id: &str) -> Option<String> {
    let exported = code.contains("export default") || code.contains("export const");
    let wrapped = if exported {
        code.to_string()
    } else {
        wrap_fragment(code, screen_id)
    };
    let fixed = import_use_memo(&wrapped).unwrap_or(wrapped);
    (fixed != code).then_some(fixed)
}

fn wrap_fragment(code: &str, screen_id: &str) -> String {
    let has_imports = code.contains("import");
    let imports = if code.contains("useState") && !has_imports {
        "import React, { useState, useMemo } from 'react';"
    } else if code.contains("useMemo") && !has_imports {
        "import React, { useMemo } from 'react';"
    } else {
        "import React from 'react';"
    };
    format!(
        "{imports}\n\n{code}\n\nexport default {}Screen;\n",
        pascal_case(screen_id)
    )
}

fn import_use_memo(code: &str) -> Option<String> {
    if !code.contains("useMemo") {
        return None;
    }
    if let Some(caps) = REACT_HOOK_IMPORT.captures(code) {
        let mut hooks: Vec<&str> = caps[1]
            .split(',')
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .collect();
        if hooks.contains(&"useMemo") {
            return None;
        }
        hooks.push("useMemo");
        let rewritten = format!("import React, {{ {} }} from 'react'", hooks.join(", "));
        return Some(REACT_HOOK_IMPORT.replace(code, rewritten.as_str()).into_owned());
    }
    code.contains(PLAIN_REACT_IMPORT)
        .then(|| code.replacen(PLAIN_REACT_IMPORT, "import React, { useMemo } from 'react'", 1))
}

fn utility_placeholder(screen_id: &str) -> String {
    let name = pascal_case(screen_id);
    format!(
        r#"import React from 'react';

// Utility function example from @auth0/auth0-acul-js, not a screen component.
// See https://auth0.github.io/universal-login for usage.

const {name}Screen: React.FC = () => {{
  return (
    <div className="min-h-screen bg-gray-100 flex items-center justify-center p-8">
      <div className="bg-white rounded-lg shadow-lg p-8 max-w-2xl">
        <h1 className="text-2xl font-bold mb-4">Utility Function Example</h1>
        <p className="text-gray-600 mb-4">
          This file demonstrates a utility function from @auth0/auth0-acul-js.
          It is not meant to be deployed as a screen component.
        </p>
      </div>
    </div>
  );
}};

export default {name}Screen;
"#
    )
}
