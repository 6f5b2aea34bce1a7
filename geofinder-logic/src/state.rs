use serde::{Deserialize, Serialize};

use crate::location::{LocationFix, PositionError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, specta::Type)]
/// Category of a failed location query
pub enum LocationErrorKind {
    /// The user declined location access
    PermissionDenied,
    /// The platform couldn't determine a position
    PositionUnavailable,
    /// The platform ran out of time
    Timeout,
    /// This platform can't query location at all
    Unsupported,
    /// Any other failure
    Unknown,
}

impl LocationErrorKind {
    /// The message shown to the user for this kind of failure
    pub fn message(self) -> &'static str {
        match self {
            Self::Unsupported => "Il tuo browser non supporta la geolocalizzazione.",
            Self::PermissionDenied => {
                "⚠️ Non hai consentito l’accesso alla posizione. Senza questo permesso la web app non può funzionare correttamente."
            }
            Self::PositionUnavailable => {
                "Le informazioni sulla posizione non sono disponibili. Riprova più tardi o spostati in un'area aperta."
            }
            Self::Timeout => {
                "La richiesta di ottenere la posizione è scaduta. Controlla la tua connessione e riprova."
            }
            Self::Unknown => "Si è verificato un errore sconosciuto nel recupero della posizione.",
        }
    }
}

impl From<&PositionError> for LocationErrorKind {
    fn from(err: &PositionError) -> Self {
        match err {
            PositionError::PermissionDenied => Self::PermissionDenied,
            PositionError::PositionUnavailable => Self::PositionUnavailable,
            PositionError::Timeout => Self::Timeout,
            PositionError::Unknown(_) => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, specta::Type)]
/// A failed query, the kind and the user facing message always travel together
pub struct LocationFailure {
    pub kind: LocationErrorKind,
    pub message: String,
}

impl From<LocationErrorKind> for LocationFailure {
    fn from(kind: LocationErrorKind) -> Self {
        Self {
            kind,
            message: kind.message().to_string(),
        }
    }
}

impl From<PositionError> for LocationFailure {
    fn from(err: PositionError) -> Self {
        LocationErrorKind::from(&err).into()
    }
}

#[derive(Debug, Clone)]
/// Something that happened to the location request
pub enum LocationEvent {
    /// The capability check failed, no query was made
    Unsupported,
    /// A query was sent to the platform
    Dispatched,
    /// The platform answered a query
    Resolved(Result<LocationFix, PositionError>),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, specta::Type)]
/// Outcome of the latest location query, this is everything the UI needs to render
pub struct LocationState {
    /// Set after the latest query succeeded
    pub fix: Option<LocationFix>,
    /// Set after the latest query failed
    pub error: Option<LocationFailure>,
    /// A query is in flight
    pub busy: bool,
}

impl LocationState {
    /// Compute the state that follows `event`. States are always rebuilt whole, never patched.
    pub fn transition(&self, event: LocationEvent) -> Self {
        match event {
            LocationEvent::Unsupported => Self {
                fix: None,
                error: Some(LocationErrorKind::Unsupported.into()),
                busy: false,
            },
            // Keep showing the previous fix until the new one comes in
            LocationEvent::Dispatched => Self {
                fix: self.fix,
                error: None,
                busy: true,
            },
            LocationEvent::Resolved(Ok(fix)) => Self {
                fix: Some(fix),
                error: None,
                busy: false,
            },
            LocationEvent::Resolved(Err(why)) => Self {
                fix: None,
                error: Some(why.into()),
                busy: false,
            },
        }
    }

    pub fn is_idle(&self) -> bool {
        !self.busy && self.fix.is_none() && self.error.is_none()
    }

    pub fn error_kind(&self) -> Option<LocationErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }
}
