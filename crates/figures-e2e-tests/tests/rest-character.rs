use figures_dal::character::Character;
use figures_e2e_tests::{extend_url, launch_env, seed_file, test_config};
use serde_json::{Value, json};
use tracing::info;
use tracing_test::traced_test;

fn ids(page: &Value) -> Vec<&str> {
    page["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect()
}

#[tokio::test]
#[traced_test]
async fn test_paging() {
    let args = test_config(&["--default-page-size", "4"]).unwrap();
    let env = launch_env(args).await.unwrap();
    let api_url = env.api_url("api/character");

    let count_url = extend_url(&api_url, "count");
    let count: u64 = env
        .client
        .get(count_url)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(count, 6);

    let response = env.client.get(api_url.clone()).send().await.unwrap();
    info!("Response: {:#?}", response);
    assert!(response.status().is_success());
    let page: Value = response.json().await.unwrap();
    assert_eq!(page["total"], 6);
    assert_eq!(page["total_pages"], 2);
    assert_eq!(ids(&page), vec!["1", "2", "3", "4"]);

    let get_page = async |query: &str| {
        let mut page_url = api_url.clone();
        page_url.set_query(Some(query));
        let response = env.client.get(page_url).send().await.unwrap();
        info!("Response: {:#?}", response);
        let status = response.status().as_u16();
        let page: Value = response.json().await.unwrap();
        (status, page)
    };

    let (_, page) = get_page("page=2&page_size=4").await;
    assert_eq!(ids(&page), vec!["5", "6"]);
    assert_eq!((page["first_row"].as_u64(), page["last_row"].as_u64()), (Some(5), Some(6)));

    let (_, page) = get_page("sort=-likes&page_size=3").await;
    assert_eq!(ids(&page), vec!["4", "1", "2"]);

    let (_, page) = get_page("sort=birthDate").await;
    assert_eq!(ids(&page), vec!["2", "6", "3", "4"]);

    let (_, page) = get_page("filter=%D8%B4%DB%8C%D8%B1%D8%A7%D8%B2%DB%8C").await;
    assert_eq!(ids(&page), vec!["1", "5"]);

    let (_, page) = get_page("filter=poet&sort=-name").await;
    assert_eq!(page["total"], 3);

    let (_, page) = get_page("filter=nothing-like-this").await;
    assert_eq!(page["total"], 0);
    assert_eq!(page["total_pages"], 0);
    assert_eq!(page["first_row"], 0);

    let (status, body) = get_page("sort=gender").await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("gender"));

    let (status, _) = get_page("sort=name,-likes").await;
    assert_eq!(status, 400);

    let (status, _) = get_page("page_size=0").await;
    assert_eq!(status, 422);
}

#[tokio::test]
#[traced_test]
async fn test_lookups() {
    let args = test_config(&[]).unwrap();
    let env = launch_env(args).await.unwrap();
    let api_url = env.api_url("api/character");

    let response = env.client.get(extend_url(&api_url, "4")).send().await.unwrap();
    assert!(response.status().is_success());
    let rumi: Character = response.json().await.unwrap();
    assert_eq!(rumi.likes, 298);
    assert_eq!(rumi.works.len(), 3);

    let response = env
        .client
        .get(extend_url(&api_url, "missing"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let poets: Vec<Character> = env
        .client
        .get(env.api_url("api/character/by-field/poet"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(poets.len(), 3);

    let response = env
        .client
        .get(env.api_url("api/character/by-field/painter"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let inactive: Vec<Character> = env
        .client
        .get(env.api_url("api/character/by-status/Inactive"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(inactive.is_empty());

    let all: Vec<Character> = env
        .client
        .get(env.api_url("api/character/all"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 6);

    let satisfaction: Value = env
        .client
        .get(env.api_url("api/character/1/satisfaction"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(satisfaction["satisfaction"], 81.7);
}

#[tokio::test]
#[traced_test]
async fn test_create_update_like() {
    let args = test_config(&[]).unwrap();
    let env = launch_env(args).await.unwrap();
    let api_url = env.api_url("api/character");

    let payload = json!({
        "name": "Mahsati Ganjavi",
        "gender": "Female",
        "birthDate": "1089",
        "fieldOfActivity": "Poet",
        "works": ["Rubaiyat"],
    });
    let response = env
        .client
        .post(api_url.clone())
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let created: Character = response.json().await.unwrap();
    assert_eq!(created.likes, 0);
    assert_eq!(created.status, figures_types::Status::Active);

    let invalid = json!({
        "name": "M",
        "gender": "Female",
        "birthDate": " ",
        "fieldOfActivity": "Poet",
    });
    let response = env
        .client
        .post(api_url.clone())
        .json(&invalid)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 422);
    let body: Value = response.json().await.unwrap();
    let fields = body["fields"].as_object().unwrap();
    assert!(fields.contains_key("name"));
    assert!(fields.contains_key("birth_date"));

    let missing_enum = json!({"name": "Mahsati", "birthDate": "1089", "fieldOfActivity": "Poet"});
    let response = env
        .client
        .post(api_url.clone())
        .json(&missing_enum)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 422);

    let record_url = extend_url(&api_url, &created.id);
    let mut update = payload.clone();
    update["deathDate"] = json!("1159");
    update["status"] = json!("Inactive");
    let response = env
        .client
        .put(record_url.clone())
        .json(&update)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let updated: Character = response.json().await.unwrap();
    assert_eq!(updated.death_date.as_deref(), Some("1159"));
    assert_eq!(updated.created_at, created.created_at);

    let like_url = extend_url(&record_url, "like");
    for _ in 0..2 {
        let response = env.client.post(like_url.clone()).send().await.unwrap();
        assert!(response.status().is_success());
    }
    let response = env.client.delete(like_url.clone()).send().await.unwrap();
    let liked: Character = response.json().await.unwrap();
    assert_eq!(liked.likes, 1);
    for _ in 0..3 {
        env.client.delete(like_url.clone()).send().await.unwrap();
    }
    assert_eq!(env.state.characters().get(&created.id).await.unwrap().likes, 0);

    let response = env
        .client
        .post(env.api_url("api/character/missing/like"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
#[traced_test]
async fn test_seed_file() {
    let characters = json!([
        {"id": "a", "name": "Nezami", "gender": "Male", "birthDate": "1141",
         "fieldOfActivity": "Poet", "likes": 3,
         "createdAt": "2024-02-01T10:00:00Z", "updatedAt": "2024-02-01T10:00:00Z"},
        {"id": "b", "name": "Tusi", "gender": "Male", "birthDate": "1201", "deathDate": "1274",
         "fieldOfActivity": "Astronomer", "likes": 9,
         "createdAt": "2024-02-01T10:00:00Z", "updatedAt": "2024-02-01T10:00:00Z"}
    ]);
    let seed = seed_file("test_seed_file", &characters).unwrap();
    let path = seed.path.to_string_lossy().to_string();
    let args = test_config(&["--seed-file", &path]).unwrap();
    let env = launch_env(args).await.unwrap();

    let mut url = env.api_url("api/character");
    url.set_query(Some("sort=-deathDate"));
    let page: Value = env.client.get(url).send().await.unwrap().json().await.unwrap();
    assert_eq!(page["total"], 2);
    // missing death date stays last
    assert_eq!(ids(&page), vec!["b", "a"]);
}
