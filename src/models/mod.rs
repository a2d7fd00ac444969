pub mod activity;
pub mod connection;
pub mod preferences;
pub mod profile;

pub use activity::{
    ActivityFeedRow, ActivityStatus, ActivityVisibility, JoinableActivityRow, ParticipantAction,
    ParticipantRow, ParticipantStatus,
};
pub use connection::{ConnectionAction, ConnectionRole, ConnectionRow, ConnectionStatus};
pub use preferences::{
    LocationPreferenceRow, MatchingPreferenceRow, PreferencesUpdate, PreferencesView,
};
pub use profile::{
    AgeBucket, CandidateProfile, CandidateProfileRow, Faith, FaithFilter, Gender, Origin,
    Pronouns, PublicProfile, RequesterProfile, RequesterProfileRow,
};
