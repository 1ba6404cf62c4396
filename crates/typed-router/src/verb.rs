//! HTTP verbs supported by the binder.
//!
//! [`Verb`] is the runtime value used for registration and method matching.
//! The marker types ([`Get`], [`Post`], ...) carry the same information at the
//! type level so a route contract can pin its verb at compile time.

use std::fmt;
use std::str::FromStr;

use axum::http::Method;
use axum::routing::MethodFilter;

use crate::error::BindError;

/// One of the seven verbs a route can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Head,
    Delete,
    Options,
}

impl Verb {
    /// Every supported verb, in declaration order.
    pub const ALL: [Verb; 7] = [
        Verb::Get,
        Verb::Post,
        Verb::Put,
        Verb::Patch,
        Verb::Head,
        Verb::Delete,
        Verb::Options,
    ];

    /// The canonical upper-case method name.
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Patch => "PATCH",
            Verb::Head => "HEAD",
            Verb::Delete => "DELETE",
            Verb::Options => "OPTIONS",
        }
    }

    pub fn method(self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Patch => Method::PATCH,
            Verb::Head => Method::HEAD,
            Verb::Delete => Method::DELETE,
            Verb::Options => Method::OPTIONS,
        }
    }

    /// The router's native filter for verb-specific registration.
    pub fn filter(self) -> MethodFilter {
        match self {
            Verb::Get => MethodFilter::GET,
            Verb::Post => MethodFilter::POST,
            Verb::Put => MethodFilter::PUT,
            Verb::Patch => MethodFilter::PATCH,
            Verb::Head => MethodFilter::HEAD,
            Verb::Delete => MethodFilter::DELETE,
            Verb::Options => MethodFilter::OPTIONS,
        }
    }

    /// Exact match against an incoming request method.
    pub fn matches(self, method: &Method) -> bool {
        self.method() == *method
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = BindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Verb::ALL
            .into_iter()
            .find(|verb| verb.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| BindError::InvalidMethod {
                method: s.to_string(),
            })
    }
}

impl TryFrom<&Method> for Verb {
    type Error = BindError;

    fn try_from(method: &Method) -> Result<Self, Self::Error> {
        method.as_str().parse()
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Type-level verb, implemented only by the marker types in this module.
pub trait VerbMarker: sealed::Sealed + Send + Sync + 'static {
    const VERB: Verb;
}

macro_rules! verb_markers {
    ($($(#[$meta:meta])* $marker:ident => $verb:ident,)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
            pub struct $marker;

            impl sealed::Sealed for $marker {}

            impl VerbMarker for $marker {
                const VERB: Verb = Verb::$verb;
            }
        )*
    };
}

verb_markers! {
    /// `GET` at the type level.
    Get => Get,
    /// `POST` at the type level.
    Post => Post,
    Put => Put,
    Patch => Patch,
    Head => Head,
    Delete => Delete,
    Options => Options,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_verb_case_insensitively() {
        for verb in Verb::ALL {
            assert_eq!(verb.as_str().parse::<Verb>(), Ok(verb));
            assert_eq!(verb.as_str().to_lowercase().parse::<Verb>(), Ok(verb));
        }
    }

    #[test]
    fn rejects_unknown_method() {
        assert_eq!(
            "TRACE".parse::<Verb>(),
            Err(BindError::InvalidMethod {
                method: "TRACE".to_string()
            })
        );
        assert!("".parse::<Verb>().is_err());
    }

    #[test]
    fn matches_only_its_own_method() {
        assert!(Verb::Get.matches(&Method::GET));
        assert!(!Verb::Get.matches(&Method::HEAD));
        assert!(!Verb::Post.matches(&Method::GET));
    }

    #[test]
    fn markers_carry_their_verb() {
        assert_eq!(<Get as VerbMarker>::VERB, Verb::Get);
        assert_eq!(<Options as VerbMarker>::VERB, Verb::Options);
    }

    #[test]
    fn converts_from_method() {
        assert_eq!(Verb::try_from(&Method::PATCH), Ok(Verb::Patch));
        assert!(Verb::try_from(&Method::CONNECT).is_err());
    }
}
