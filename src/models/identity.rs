use serde::{Deserialize, Serialize};

// Identity of the participant joining a room, as resolved by the caller.
// This service does not authenticate; it embeds these claims verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Capability grant inside a conferencing room. A capability, not a display
/// label: the role decision is made upstream and honored verbatim here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Participant,
    Moderator,
}

impl Role {
    pub fn is_moderator(&self) -> bool {
        matches!(self, Role::Moderator)
    }
}

// In-room features granted to a credential. Recording, livestreaming and
// transcription follow the moderator grant; screen sharing is open to any
// role. This matrix is the entire authorization surface handed to the
// conferencing backend - keep it in this one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub recording: bool,
    pub livestream: bool,
    pub transcription: bool,
    #[serde(rename = "screen-sharing")]
    pub screen_sharing: bool,
}

/// Feature grants for a role.
pub fn features_for(role: Role) -> FeatureSet {
    let moderator = role.is_moderator();

    FeatureSet {
        recording: moderator,
        livestream: moderator,
        transcription: moderator,
        screen_sharing: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_features() {
        let features = features_for(Role::Participant);
        assert!(!features.recording);
        assert!(!features.livestream);
        assert!(!features.transcription);
        assert!(features.screen_sharing);
    }

    #[test]
    fn test_moderator_features() {
        let features = features_for(Role::Moderator);
        assert!(features.recording);
        assert!(features.livestream);
        assert!(features.transcription);
        assert!(features.screen_sharing);
    }
}
