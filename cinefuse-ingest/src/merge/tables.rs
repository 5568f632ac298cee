//! Per-source merge policy tables

use super::{MergePolicy, MovieField};

use MergePolicy::{Fill, Override};

/// Rotten Tomatoes scrape results (keyed by tmdb id)
pub const RT_FIELDS: &[(MovieField, MergePolicy)] = &[
    (MovieField::RtAudienceRating, Override),
    (MovieField::RtAudienceVotes, Override),
    (MovieField::RtCriticRating, Override),
    (MovieField::RtCriticVotes, Override),
    (MovieField::RtCriticsConsensus, Override),
    (MovieField::RtUrl, Override),
    (MovieField::RtId, Override),
    (MovieField::EmsId, Override),
    (MovieField::Title, Fill),
    (MovieField::MpaaRating, Fill),
    (MovieField::Plot, Fill),
];

/// Wikidata entities (keyed by tmdb id)
pub const WIKIDATA_FIELDS: &[(MovieField, MergePolicy)] = &[
    (MovieField::WikidataId, Override),
    (MovieField::Title, Fill),
    (MovieField::Runtime, Fill),
    (MovieField::Budget, Fill),
    (MovieField::Revenue, Fill),
    (MovieField::MpaaRating, Fill),
    (MovieField::Homepage, Fill),
    (MovieField::RtUrl, Fill),
    (MovieField::NetflixId, Fill),
    (MovieField::HuluId, Fill),
    (MovieField::AmazonId, Fill),
    (MovieField::AppleTvId, Fill),
    (MovieField::TwitterId, Fill),
    (MovieField::TwitterUsername, Fill),
    (MovieField::FacebookId, Fill),
    (MovieField::InstagramId, Fill),
    (MovieField::GoogleKgId, Fill),
    (MovieField::TraktTvId, Fill),
    (MovieField::RedditTopicId, Fill),
    (MovieField::LetterboxdId, Fill),
    (MovieField::MetacriticId, Fill),
    (MovieField::AllMovieId, Fill),
    (MovieField::DisneyPlusId, Fill),
    (MovieField::HboMaxId, Fill),
    (MovieField::MetacriticRating, Fill),
    (MovieField::MetacriticVotes, Fill),
    (MovieField::RtAudienceRating, Fill),
    (MovieField::RtAudienceVotes, Fill),
    (MovieField::RtCriticRating, Fill),
    (MovieField::RtCriticVotes, Fill),
];

/// FlickMetrix listing rows (keyed by imdb id).
///
/// The IMDB rating pair is not in this table: it goes through
/// [`super::reconcile_imdb_rating`].
pub const FLICK_METRIX_FIELDS: &[(MovieField, MergePolicy)] = &[
    (MovieField::Cast, Fill),
    (MovieField::Director, Fill),
    (MovieField::Production, Override),
    (MovieField::AwardsSummary, Override),
    (MovieField::RtCriticRating, Override),
    (MovieField::RtCriticVotes, Override),
    (MovieField::RtAudienceRating, Override),
    (MovieField::RtAudienceVotes, Override),
    (MovieField::RtUrl, Override),
    (MovieField::LetterboxdScore, Override),
    (MovieField::LetterboxdVotes, Override),
    (MovieField::FlickMetrixId, Override),
    (MovieField::FlickMetrixScore, Override),
    (MovieField::Plot, Fill),
];

/// OMDB records (keyed by imdb id). Fill only, merged last.
pub const OMDB_FIELDS: &[(MovieField, MergePolicy)] = &[
    (MovieField::Director, Fill),
    (MovieField::Plot, Fill),
    (MovieField::MpaaRating, Fill),
    (MovieField::Production, Fill),
    (MovieField::AwardsSummary, Fill),
    (MovieField::RtUrl, Fill),
    (MovieField::MetacriticRating, Fill),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_no_field_listed_twice_per_source() {
        for table in [RT_FIELDS, WIKIDATA_FIELDS, FLICK_METRIX_FIELDS, OMDB_FIELDS] {
            let fields: HashSet<_> = table.iter().map(|(f, _)| *f).collect();
            assert_eq!(fields.len(), table.len());
        }
    }

    #[test]
    fn test_omdb_is_fill_only() {
        assert!(OMDB_FIELDS.iter().all(|(_, p)| *p == MergePolicy::Fill));
    }
}
