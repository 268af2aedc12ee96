//! Integration tests for the scraping pipeline
//!
//! These tests use wiremock to stand in for the KOBIS site and drive every
//! public operation end-to-end through the real HTTP client.

use chrono::NaiveDate;
use kobis_scraper::transport::{Endpoint, FormFields};
use kobis_scraper::{Config, ErrorKind, ImageKind, Kobis, KobisError, MovieCode, RoleType};
use wiremock::matchers::{body_string_contains, header, headers, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const POSTER_HREF: &str = "/common/mast/movie/2022/11/5fc3cbc27da64a1983c9abc90599d185.jpg";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Scraper pointed at the mock server
fn kobis_for(server: &MockServer) -> Kobis {
    Kobis::new(&Config::with_origin(server.uri())).expect("Failed to build scraper")
}

/// Scraper pointed at a port nothing listens on
fn unreachable_kobis() -> Kobis {
    let mut config = Config::with_origin("http://127.0.0.1:9");
    config.http.timeout_secs = 2;
    config.http.connect_timeout_secs = 1;
    Kobis::new(&config).expect("Failed to build scraper")
}

fn ranking_row(rank: u32, title: &str, code: u32) -> String {
    format!(
        r##"<tr><td>{rank}</td><td class="tit"><span class="ellip per90"><a href="#" title="{title}" onclick="mstView('movie','{code}');return false;">{title}</a></span></td><td>2022-11-09</td><td>1,000,000</td></tr>"##
    )
}

fn ranking_block(heading: &str, rows: &[String]) -> String {
    format!(
        r#"<div class="board_tit"><h4>{heading}</h4><table class="tbl_comm"><thead><tr><th>순위</th><th>영화명</th><th>개봉일</th><th>매출액</th></tr></thead><tbody>{}</tbody></table></div>"#,
        rows.concat()
    )
}

fn ranking_page() -> String {
    let blocks = [
        ranking_block(
            "2022년 11월 16일(수)",
            &[
                ranking_row(1, "블랙 팬서: 와칸다 포에버", 20226254),
                ranking_row(2, "올빼미", 20210846),
                ranking_row(3, "데시벨", 20198482),
            ],
        ),
        ranking_block(
            "2022년 11월 17일(목)",
            &[
                ranking_row(1, "블랙 팬서: 와칸다 포에버", 20226254),
                ranking_row(2, "데시벨", 20198482),
            ],
        ),
        ranking_block(
            "2022년 11월 18일(금)",
            &[ranking_row(1, "올빼미", 20210846)],
        ),
    ];
    format!(
        r#"<html><body><div class="rst_sch">{}</div></body></html>"#,
        blocks.concat()
    )
}

fn detail_popup() -> String {
    format!(
        r#"<html><body>
        <div class="item_tab basic">
          <a class="fl thumb" href="{POSTER_HREF}"><img src="/common/mast/movie/2022/11/thumb_x192/thn_5fc3cbc27da64a1983c9abc90599d185.jpg"></a>
        </div>
        <div class="info2">
          <strong class="tit_info">포스터</strong>
          <ul>
            <li><img src="/common/mast/movie/2022/11/thumb_x192/thn_5fc3cbc27da64a1983c9abc90599d185.jpg"></li>
            <li><img src="/common/mast/movie/2022/11/thumb_x150/thn_0a1b2c.jpg"></li>
          </ul>
        </div>
        <div class="info2">
          <strong class="tit_info">스틸컷</strong>
          <ul><li><img src="/common/mast/still/2022/11/thumb_x150/thn_d4e5f6.jpg"></li></ul>
        </div>
        <div class="info2">
          <strong class="tit_info">시놉시스</strong>
          <p class="desc_info">“와칸다를 지켜라!” 거대한 두 세계의 충돌,
            아쿠아맨 이후 최초로 바다에서 펼쳐지는 전쟁.</p>
        </div>
        </body></html>"#
    )
}

fn search_row(title: &str, code: u32) -> String {
    format!(
        r#"<tr><td title="{title}"><a href="javascript:void(0);">{title}</a></td><td>Eng</td><td>2022</td><td>미국</td><td>장편</td><td>액션</td><td>개봉</td><td>{code}</td></tr>"#
    )
}

fn search_page(rows: &[String]) -> String {
    format!(
        r#"<html><body><table class="tbl3"><thead><tr><th>영화명</th></tr></thead><tbody>{}</tbody></table></body></html>"#,
        rows.concat()
    )
}

/// Accept header of the actor-list request; wiremock splits it on commas
fn json_accept() -> wiremock::matchers::HeaderExactMatcher {
    headers(
        "accept",
        vec!["application/json", "text/javascript", "*/*; q=0.01"],
    )
}

fn form_content_type() -> wiremock::matchers::HeaderExactMatcher {
    header(
        "content-type",
        "application/x-www-form-urlencoded; charset=UTF-8",
    )
}

async fn mount_detail(server: &MockServer, code: u32, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(Endpoint::MovieDetail.path()))
        .and(body_string_contains(format!("code={}", code).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_popup()))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_box_office_three_day_range() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(Endpoint::DailyBoxOffice.path()))
        .and(body_string_contains("sSearchFrom=2022-11-16"))
        .and(body_string_contains("sSearchTo=2022-11-18"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ranking_page()))
        .expect(1)
        .mount(&server)
        .await;

    let kobis = kobis_for(&server);
    let box_office = kobis
        .box_office(date(2022, 11, 16), date(2022, 11, 18))
        .await
        .expect("Box office should parse");

    assert_eq!(box_office.len(), 3);

    for day in box_office.dates() {
        let entries = box_office.get_by_date(day).unwrap();
        assert!(!entries.is_empty());

        // Ranks start at 1 and are contiguous
        for (i, entry) in entries.iter().enumerate() {
            assert_eq!(entry.rank as usize, i + 1);
            assert_eq!(entry.date, day);
        }
    }

    let first_day = box_office.get_by_date(date(2022, 11, 16)).unwrap();
    assert_eq!(first_day[0].title, "블랙 팬서: 와칸다 포에버");
    assert_eq!(first_day[0].code, 20226254);
    assert_eq!(first_day[2].code, 20198482);
}

#[tokio::test]
async fn test_box_office_unscraped_date() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(Endpoint::DailyBoxOffice.path()))
        .respond_with(ResponseTemplate::new(200).set_body_string(ranking_page()))
        .expect(1)
        .mount(&server)
        .await;

    let kobis = kobis_for(&server);
    let box_office = kobis
        .box_office(date(2022, 11, 16), date(2022, 11, 19))
        .await
        .unwrap();

    // Queries are answered from memory; the mock allows a single request
    for _ in 0..3 {
        assert!(box_office.get_by_date(date(2022, 11, 17)).is_ok());
    }

    let err = box_office.get_by_date(date(2022, 11, 19)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DateNotScraped);
    assert!(box_office.get_by_date(date(2022, 11, 15)).is_err());
}

#[tokio::test]
async fn test_detail_popup_is_fetched_once_per_code() {
    let server = MockServer::start().await;
    mount_detail(&server, 20226254, 1).await;

    let kobis = kobis_for(&server);

    let synopsis = kobis.synopsis(20226254).await.unwrap();
    let poster = kobis.main_poster(20226254).await.unwrap();
    let stills = kobis
        .image_urls(20226254, ImageKind::StillCut, true)
        .await
        .unwrap();

    assert!(synopsis.starts_with("“와칸다를 지켜라!” 거대한 두 세계의 충돌,"));
    assert_eq!(poster, format!("{}{}", server.uri(), POSTER_HREF));
    assert_eq!(stills.len(), 1);
    assert!(kobis.detail_cache().contains(20226254).await);
}

#[tokio::test]
async fn test_distinct_codes_fetch_independently() {
    let server = MockServer::start().await;
    mount_detail(&server, 1001, 1).await;
    mount_detail(&server, 1002, 1).await;

    let kobis = kobis_for(&server);
    kobis.synopsis(1001).await.unwrap();
    kobis.synopsis(1002).await.unwrap();
    kobis.synopsis(1001).await.unwrap();

    assert_eq!(kobis.detail_cache().len().await, 2);
}

#[tokio::test]
async fn test_clear_forces_refetch() {
    let server = MockServer::start().await;
    mount_detail(&server, 20226254, 2).await;

    let kobis = kobis_for(&server);
    let before = kobis.detail(20226254).await.unwrap();
    let cached = kobis.detail(20226254).await.unwrap();
    assert!(before.ptr_eq(&cached));

    kobis.clear_detail_cache().await;
    assert!(kobis.detail_cache().is_empty().await);

    let after = kobis.detail(20226254).await.unwrap();
    assert!(!before.ptr_eq(&after));
}

#[tokio::test]
async fn test_concurrent_gets_share_one_fetch() {
    let server = MockServer::start().await;
    mount_detail(&server, 7, 1).await;

    let kobis = kobis_for(&server);
    let (a, b) = tokio::join!(kobis.detail(7), kobis.detail(7));
    assert!(a.unwrap().ptr_eq(&b.unwrap()));
}

#[tokio::test]
async fn test_concurrent_gets_for_distinct_codes() {
    let server = MockServer::start().await;
    mount_detail(&server, 11, 1).await;
    mount_detail(&server, 12, 1).await;

    let kobis = kobis_for(&server);

    // Fetches queue behind the cache lock but each code is fetched once
    let (a, b, c) = tokio::join!(kobis.detail(11), kobis.detail(12), kobis.detail(11));
    assert_eq!(a.unwrap().code(), 11);
    assert_eq!(b.unwrap().code(), 12);
    assert_eq!(c.unwrap().code(), 11);
    assert_eq!(kobis.detail_cache().len().await, 2);
}

#[tokio::test]
async fn test_bounded_cache_evicts_oldest() {
    let server = MockServer::start().await;
    mount_detail(&server, 1, 2).await;
    mount_detail(&server, 2, 1).await;

    let mut config = Config::with_origin(server.uri());
    config.cache.max_entries = 1;
    let kobis = Kobis::new(&config).unwrap();

    kobis.detail(1).await.unwrap();
    kobis.detail(2).await.unwrap();
    assert!(!kobis.detail_cache().contains(1).await);

    // Evicted, so fetched again
    kobis.detail(1).await.unwrap();
    assert_eq!(kobis.detail_cache().len().await, 1);
}

#[tokio::test]
async fn test_failed_fetch_stores_nothing() {
    let kobis = unreachable_kobis();

    let err = kobis.synopsis(20226254).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(matches!(err, KobisError::Transport { .. }));
    assert!(kobis.detail_cache().is_empty().await);
}

#[tokio::test]
async fn test_image_urls_thumbnail_and_full_size() {
    let server = MockServer::start().await;
    mount_detail(&server, 20226254, 1).await;

    let kobis = kobis_for(&server);
    let origin = server.uri();

    let thumbs = kobis
        .image_urls(20226254, ImageKind::Poster, true)
        .await
        .unwrap();
    assert_eq!(
        thumbs,
        vec![
            format!("{origin}/common/mast/movie/2022/11/thumb_x640/thn_5fc3cbc27da64a1983c9abc90599d185.jpg"),
            format!("{origin}/common/mast/movie/2022/11/thumb_x640/thn_0a1b2c.jpg"),
        ]
    );

    let full = kobis
        .image_urls(20226254, ImageKind::Poster, false)
        .await
        .unwrap();
    assert_eq!(full[0], format!("{origin}{POSTER_HREF}"));
    assert_eq!(full[1], format!("{origin}/common/mast/movie/2022/11/0a1b2c.jpg"));

    let stills = kobis
        .image_urls(20226254, ImageKind::StillCut, false)
        .await
        .unwrap();
    assert_eq!(stills, vec![format!("{origin}/common/mast/still/2022/11/d4e5f6.jpg")]);
}

#[tokio::test]
async fn test_missing_synopsis_panel() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(Endpoint::MovieDetail.path()))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><div class="info2"><strong>포스터</strong></div></body></html>"#,
        ))
        .mount(&server)
        .await;

    let kobis = kobis_for(&server);
    let err = kobis.synopsis(5).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FieldNotFound);

    let err = kobis.main_poster(5).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedPage);
}

#[tokio::test]
async fn test_actor_list() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(Endpoint::ActorList.path()))
        .and(json_accept())
        .and(form_content_type())
        .and(body_string_contains("movieCd=20226254"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"[
                {"peopleNm": "레티티아 라이트", "cast": "슈리", "actorGb": "1"},
                {"peopleNm": "앤젤라 바셋", "cast": "라몬다", "actorGb": "2"},
                {"peopleNm": "마틴 프리먼", "cast": "에버렛 로스", "actorGb": "3"},
                {"peopleNm": "무명", "cast": "", "actorGb": "4"},
                {"peopleNm": "행인", "cast": "행인1", "actorGb": "5"}
            ]"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let kobis = kobis_for(&server);
    let actors = kobis.actor_list(20226254).await.unwrap();

    let roles: Vec<RoleType> = actors.iter().map(|a| a.role_type).collect();
    assert_eq!(
        roles,
        vec![
            RoleType::Lead,
            RoleType::Supporting,
            RoleType::SpecialAppearance,
            RoleType::Unknown,
            RoleType::Extra,
        ]
    );
    assert_eq!(actors[0].actor_name, "레티티아 라이트");
    assert_eq!(actors[0].character_name, "슈리");
}

#[tokio::test]
async fn test_plain_post_lacks_json_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(Endpoint::ActorList.path()))
        .and(json_accept())
        .and(form_content_type())
        .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let kobis = kobis_for(&server);
    let form = FormFields::actor_list(20226254);

    // Unmatched requests get wiremock's empty 404 body
    let plain = kobis
        .transport()
        .post(Endpoint::ActorList, &form)
        .await
        .unwrap();
    assert_eq!(plain, "");

    let negotiated = kobis
        .transport()
        .post_json(Endpoint::ActorList, &form)
        .await
        .unwrap();
    assert_eq!(negotiated, "[]");
}

#[tokio::test]
async fn test_search_skips_malformed_rows() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(Endpoint::Search.path()))
        .and(body_string_contains("curPage=2"))
        .and(body_string_contains("openStartDt=2021"))
        .and(body_string_contains("openEndDt=2022"))
        .respond_with(ResponseTemplate::new(200).set_body_string(search_page(&[
            search_row("블랙 팬서: 와칸다 포에버", 20226254),
            r#"<tr><td colspan="8">총 2건</td></tr>"#.to_string(),
            search_row("올빼미", 20210846),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let kobis = kobis_for(&server);
    let movies = kobis.search_movies(2021, 2022, 2).await.unwrap();

    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0], MovieCode::new("블랙 팬서: 와칸다 포에버", 0));
    assert_eq!(movies[0].code, 20226254);
    assert_eq!(movies[1].code, 20210846);
}

#[tokio::test]
async fn test_search_degrades_on_transport_failure() {
    let kobis = unreachable_kobis();
    let movies = kobis.search_movies(2021, 2022, 1).await.unwrap();
    assert!(movies.is_empty());
}

#[tokio::test]
async fn test_other_operations_propagate_transport_failure() {
    let kobis = unreachable_kobis();

    let err = kobis
        .box_office(date(2022, 11, 16), date(2022, 11, 18))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);

    let err = kobis.actor_list(1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn test_error_status_body_is_still_parsed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(Endpoint::Search.path()))
        .respond_with(
            ResponseTemplate::new(500).set_body_string(search_page(&[search_row("올빼미", 20210846)])),
        )
        .mount(&server)
        .await;

    let kobis = kobis_for(&server);
    let movies = kobis.search_movies(2022, 2022, 1).await.unwrap();
    assert_eq!(movies.len(), 1);
}

#[tokio::test]
async fn test_retries_exhaust_to_transport_error() {
    let mut config = Config::with_origin("http://127.0.0.1:9");
    config.http.timeout_secs = 2;
    config.http.connect_timeout_secs = 1;
    config.http.max_retries = 2;
    config.http.retry_delay_ms = 10;
    let kobis = Kobis::new(&config).unwrap();

    let err = kobis.actor_list(1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}
