//! The built-in stylesheet every document is styled with first.
//!
//! Based on the suggested rendering in
//! [WHATWG HTML § 15](https://html.spec.whatwg.org/multipage/rendering.html).
//!
//! Normal UA declarations lose to every author declaration. The suggested
//! default margins (`p`, headings, lists, `body`) are left out, so an unstyled
//! document stacks its blocks with no gaps.

use std::sync::OnceLock;

use crate::parser::Stylesheet;

/// [WHATWG HTML § 15.3 Rendering: Suggested default style sheet](https://html.spec.whatwg.org/multipage/rendering.html#the-css-user-agent-style-sheet-and-presentational-hints)
///
/// Display types and font defaults for the elements the engine renders.
const UA_CSS: &str = r#"
/* Never rendered. */
area, base, basefont, datalist, head, link, meta, noembed,
noframes, param, rp, script, style, template, title {
    display: none;
}

[hidden] {
    display: none;
}

/* [§ 15.3.3 Flow content](https://html.spec.whatwg.org/multipage/rendering.html#flow-content-3) */
/* "The following elements must have their 'display' property set to 'block'." */
address, article, aside, blockquote, body, center, dd, details,
dialog, dir, div, dl, dt, fieldset, figcaption, figure, footer,
form, h1, h2, h3, h4, h5, h6, header, hgroup, hr, html, legend,
listing, main, menu, nav, ol, p, plaintext, pre, search,
section, summary, ul, xmp, table, tr, caption {
    display: block;
}

/* [§ 15.3.7 Lists](https://html.spec.whatwg.org/multipage/rendering.html#lists) */
/* "li { display: list-item; }" */
li {
    display: list-item;
}

/* [§ 15.3.6 Sections and headings](https://html.spec.whatwg.org/multipage/rendering.html#sections-and-headings) */
h1 { font-size: 2em; font-weight: bold; }
h2 { font-size: 1.5em; font-weight: bold; }
h3 { font-size: 1.17em; font-weight: bold; }
h4 { font-weight: bold; }
h5 { font-size: 0.83em; font-weight: bold; }
h6 { font-size: 0.67em; font-weight: bold; }

/* [§ 15.3.4 Phrasing content](https://html.spec.whatwg.org/multipage/rendering.html#phrasing-content-3) */
/* "b, strong { font-weight: bolder; }" */
b, strong, th {
    font-weight: bolder;
}

/* "i, cite, em, var, dfn { font-style: italic; }" */
em, i, cite, dfn, var {
    font-style: italic;
}

small {
    font-size: smaller;
}

big {
    font-size: larger;
}

/* "listing, plaintext, pre, xmp { white-space: pre; }" */
listing, plaintext, pre, xmp {
    white-space: pre;
}

/* "td, th { white-space: nowrap }" applies only with the nowrap attribute. */
td[nowrap], th[nowrap] {
    white-space: nowrap;
}
"#;

/// The user-agent stylesheet, parsed on first use.
///
/// [CSS Cascading § 6.1](https://www.w3.org/TR/css-cascade-4/#cascade-sort):
/// its rules sort below every author rule.
#[must_use]
pub fn ua_stylesheet() -> &'static Stylesheet {
    static STYLESHEET: OnceLock<Stylesheet> = OnceLock::new();
    STYLESHEET.get_or_init(|| Stylesheet::parse(UA_CSS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ua_stylesheet_parses_every_rule() {
        let sheet = ua_stylesheet();
        assert!(sheet.len() >= 15);
        assert!(sheet.rules.iter().all(|rule| !rule.selectors.is_empty()));
    }

    #[test]
    fn test_ua_stylesheet_has_no_margins() {
        let sheet = ua_stylesheet();
        assert!(
            sheet
                .rules
                .iter()
                .flat_map(|rule| &rule.declarations)
                .all(|decl| !decl.name.starts_with("margin"))
        );
    }
}
