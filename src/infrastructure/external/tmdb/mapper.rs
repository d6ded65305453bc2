//! Maps TMDB wire DTOs to the interfaces-layer types (§4.6).

use crate::infrastructure::external::tmdb::dto::{
    EpisodeDetailDto, ResultDto, SearchResponseDto, SeasonDetailDto,
};
use crate::interfaces::external_services::{EpisodeDetail, SearchResponse, SeasonDetail, TmdbResult};

pub fn map_result(dto: ResultDto) -> TmdbResult {
    TmdbResult {
        id: dto.id,
        title: dto.title,
        name: dto.name,
        vote_average: dto.vote_average,
        vote_count: dto.vote_count,
        release_date: dto.release_date,
        first_air_date: dto.first_air_date,
        media_type: dto.media_type,
    }
}

pub fn map_search_response(dto: SearchResponseDto) -> SearchResponse {
    SearchResponse {
        results: dto.results.into_iter().map(map_result).collect(),
    }
}

pub fn map_episode(dto: EpisodeDetailDto) -> EpisodeDetail {
    EpisodeDetail {
        episode_number: dto.episode_number,
        name: dto.name,
        air_date: dto.air_date,
        runtime: dto.runtime,
    }
}

pub fn map_season_detail(dto: SeasonDetailDto) -> SeasonDetail {
    SeasonDetail {
        season_number: dto.season_number,
        episodes: dto.episodes.into_iter().map(map_episode).collect(),
    }
}
