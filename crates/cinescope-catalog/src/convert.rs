use cinescope_config::TmdbConfig;
use cinescope_models::{
    CastMember, Credits, CrewMember, Genre, MovieDetails, MovieRef, Video,
};

use crate::images;
use crate::tmdb::api::{TmdbCredits, TmdbGenre, TmdbMovie, TmdbMovieDetails, TmdbVideo};

pub fn genre(raw: TmdbGenre) -> Genre {
    Genre {
        id: raw.id,
        name: raw.name,
    }
}

/// Map a list movie into the internal view model. Genre ids resolve against
/// the label table fetched from the catalog; unknown ids are dropped.
pub fn movie_ref(raw: &TmdbMovie, genres: &[Genre], config: &TmdbConfig) -> MovieRef {
    MovieRef {
        id: raw.id,
        title: raw.title.clone(),
        poster: images::poster_url(raw.poster_path.as_deref(), &config.poster_size),
        backdrop: images::backdrop_url(raw.backdrop_path.as_deref(), &config.backdrop_size),
        rating: round_rating(raw.vote_average),
        year: release_year(raw.release_date.as_deref()),
        genres: genre_labels(&raw.genre_ids, genres),
        overview: raw.overview.clone().filter(|o| !o.is_empty()),
    }
}

pub fn movie_details(raw: &TmdbMovieDetails, config: &TmdbConfig) -> MovieDetails {
    MovieDetails {
        id: raw.id,
        title: raw.title.clone(),
        poster: images::poster_url(raw.poster_path.as_deref(), &config.poster_size),
        backdrop: images::backdrop_url(raw.backdrop_path.as_deref(), &config.backdrop_size),
        rating: round_rating(raw.vote_average),
        year: release_year(raw.release_date.as_deref()),
        genres: raw.genres.iter().map(|g| g.name.clone()).collect(),
        overview: raw.overview.clone().filter(|o| !o.is_empty()),
        runtime: raw.runtime,
        tagline: raw.tagline.clone().filter(|t| !t.is_empty()),
        status: raw.status.clone(),
        homepage: raw.homepage.clone().filter(|h| !h.is_empty()),
        imdb_id: raw.imdb_id.clone(),
        budget: raw.budget,
        revenue: raw.revenue,
        release_date: raw.release_date.clone(),
        vote_count: raw.vote_count,
        popularity: raw.popularity,
        production_companies: raw.production_companies.iter().map(|c| c.name.clone()).collect(),
        production_countries: raw.production_countries.iter().map(|c| c.name.clone()).collect(),
        spoken_languages: raw
            .spoken_languages
            .iter()
            .map(|l| l.english_name.clone())
            .collect(),
    }
}

/// Cast comes back in billing order; keep it that way even if the API ever
/// returns it shuffled.
pub fn credits(raw: TmdbCredits) -> Credits {
    let mut cast: Vec<CastMember> = raw
        .cast
        .into_iter()
        .map(|c| CastMember {
            id: c.id,
            name: c.name,
            character: c.character,
            profile: images::profile_url(c.profile_path.as_deref()),
            order: c.order,
        })
        .collect();
    cast.sort_by_key(|c| c.order);

    let crew = raw
        .crew
        .into_iter()
        .map(|c| CrewMember {
            id: c.id,
            name: c.name,
            job: c.job,
            department: c.department,
            profile: images::profile_url(c.profile_path.as_deref()),
        })
        .collect();

    Credits { cast, crew }
}

/// Official YouTube trailers sort to the front so callers can take the first
/// entry as "the" trailer.
pub fn videos(raw: Vec<TmdbVideo>) -> Vec<Video> {
    let mut videos: Vec<Video> = raw
        .into_iter()
        .map(|v| Video {
            key: v.key,
            name: v.name,
            site: v.site,
            kind: v.kind,
            official: v.official,
        })
        .collect();
    videos.sort_by_key(|v| {
        let trailer = v.site == "YouTube" && v.is_trailer();
        (!trailer, !v.official)
    });
    videos
}

pub fn genre_labels(ids: &[u64], genres: &[Genre]) -> Vec<String> {
    ids.iter()
        .filter_map(|id| genres.iter().find(|g| g.id == *id))
        .map(|g| g.name.clone())
        .collect()
}

fn round_rating(vote_average: f64) -> f64 {
    (vote_average * 10.0).round() / 10.0
}

fn release_year(date: Option<&str>) -> Option<u32> {
    date.and_then(|d| d.get(..4)).and_then(|y| y.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmdb_config() -> TmdbConfig {
        TmdbConfig::new("test-key".to_string())
    }

    fn raw_movie() -> TmdbMovie {
        TmdbMovie {
            id: 27205,
            title: "Inception".to_string(),
            overview: Some("A thief who steals corporate secrets.".to_string()),
            poster_path: Some("/poster.jpg".to_string()),
            backdrop_path: None,
            release_date: Some("2010-07-16".to_string()),
            vote_average: 8.366,
            vote_count: 34495,
            genre_ids: vec![28, 878, 12],
            popularity: 83.2,
        }
    }

    fn genre_table() -> Vec<Genre> {
        vec![
            Genre { id: 28, name: "Action".to_string() },
            Genre { id: 878, name: "Science Fiction".to_string() },
        ]
    }

    #[test]
    fn test_movie_ref_conversion() {
        let movie = movie_ref(&raw_movie(), &genre_table(), &tmdb_config());

        assert_eq!(movie.id, 27205);
        assert_eq!(movie.rating, 8.4);
        assert_eq!(movie.year, Some(2010));
        assert_eq!(movie.poster, "https://image.tmdb.org/t/p/w500/poster.jpg");
        assert!(movie.backdrop.is_none());
        // id 12 has no label in the table and is dropped
        assert_eq!(movie.genres, vec!["Action", "Science Fiction"]);
    }

    #[test]
    fn test_movie_ref_handles_missing_fields() {
        let mut raw = raw_movie();
        raw.release_date = Some(String::new());
        raw.poster_path = None;
        raw.overview = Some(String::new());

        let movie = movie_ref(&raw, &[], &tmdb_config());
        assert_eq!(movie.year, None);
        assert_eq!(movie.poster, "/placeholder-poster.jpg");
        assert!(movie.overview.is_none());
        assert!(movie.genres.is_empty());
    }

    #[test]
    fn test_credits_sorted_by_billing_order() {
        let raw = TmdbCredits {
            cast: vec![
                crate::tmdb::api::TmdbCastMember {
                    id: 2,
                    name: "Joseph Gordon-Levitt".to_string(),
                    character: "Arthur".to_string(),
                    profile_path: None,
                    order: 1,
                },
                crate::tmdb::api::TmdbCastMember {
                    id: 1,
                    name: "Leonardo DiCaprio".to_string(),
                    character: "Cobb".to_string(),
                    profile_path: Some("/leo.jpg".to_string()),
                    order: 0,
                },
            ],
            crew: vec![crate::tmdb::api::TmdbCrewMember {
                id: 3,
                name: "Christopher Nolan".to_string(),
                job: "Director".to_string(),
                department: "Directing".to_string(),
                profile_path: None,
            }],
        };

        let credits = credits(raw);
        assert_eq!(credits.cast[0].name, "Leonardo DiCaprio");
        assert_eq!(
            credits.cast[0].profile.as_deref(),
            Some("https://image.tmdb.org/t/p/w185/leo.jpg")
        );
        assert_eq!(credits.director().unwrap().name, "Christopher Nolan");
    }

    #[test]
    fn test_videos_prefer_official_youtube_trailers() {
        let raw = vec![
            TmdbVideo {
                key: "clip1".to_string(),
                name: "Behind the Scenes".to_string(),
                site: "YouTube".to_string(),
                kind: "Featurette".to_string(),
                official: true,
            },
            TmdbVideo {
                key: "trailer2".to_string(),
                name: "Fan Trailer".to_string(),
                site: "YouTube".to_string(),
                kind: "Trailer".to_string(),
                official: false,
            },
            TmdbVideo {
                key: "trailer1".to_string(),
                name: "Official Trailer".to_string(),
                site: "YouTube".to_string(),
                kind: "Trailer".to_string(),
                official: true,
            },
        ];

        let videos = videos(raw);
        assert_eq!(videos[0].key, "trailer1");
        assert_eq!(videos[1].key, "trailer2");
        assert_eq!(
            videos[0].youtube_url().unwrap(),
            "https://www.youtube.com/watch?v=trailer1"
        );
    }

    #[test]
    fn test_rating_rounds_to_one_decimal() {
        assert_eq!(round_rating(8.366), 8.4);
        assert_eq!(round_rating(7.04), 7.0);
        assert_eq!(round_rating(0.0), 0.0);
    }
}
