mod common;

use axum::http::StatusCode;
use common::{Multipart, TEST_BODY_LIMIT, png, spawn_app};
use serde_json::json;

#[tokio::test]
async fn root_greets() {
    let t = spawn_app().await;
    let (status, body) = t.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Welcome to the API!");
}

#[tokio::test]
async fn school_registration_check_and_listing() {
    let t = spawn_app().await;

    let (status, body) = t
        .post(
            "/school/register",
            json!({"name": "Hill View", "email_mobile": "office@hillview.edu", "location": "north"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let schoolid = body["schoolid"].as_str().unwrap().to_string();
    assert!(schoolid.starts_with("SCH"));
    assert_eq!(schoolid.len(), 12);
    assert_eq!(body["school_code"], schoolid.as_str());

    let (status, body) = t
        .post(
            "/school/register",
            json!({"name": "Copy", "email_mobile": "office@hillview.edu"}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let (status, _) = t.post("/school/register", json!({"name": "Nameless"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = t
        .post("/school/check", json!({"email_mobile": "office@hillview.edu"}))
        .await;
    assert_eq!(body["exists"], true);
    assert_eq!(body["school"]["name"], "Hill View");

    let (_, body) = t.get("/schools").await;
    assert_eq!(body["schools"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn bus_crud() {
    let t = spawn_app().await;

    let (_, body) = t.get("/buses/SCH1").await;
    assert_eq!(body["buses"].as_array().unwrap().len(), 0);
    assert_eq!(body["message"], "No buses found for this school");
    assert!(body.get("count").is_none());

    let (_, body) = t.post("/buses/by-school", json!({"schoolid": "SCH1"})).await;
    assert_eq!(body["count"], 0);
    assert_eq!(body["message"], "No buses found for this school");

    let (status, body) = t
        .post("/buses/add", json!({"busno": "KA-01-1234", "schoolid": "SCH1"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    let busid = body["busid"].as_str().unwrap().to_string();
    assert!(busid.starts_with("BUS"));

    let (status, _) = t.post("/buses/add", json!({"busno": "KA-01-9999"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = t.post("/buses/by-school", json!({"schoolid": "SCH1"})).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["message"], "Buses fetched successfully");
    assert_eq!(body["buses"][0]["capacity"], 40);

    let (status, _) = t
        .json(
            "PUT",
            &format!("/buses/{busid}"),
            json!({"capacity": 52, "busdescription": "AC"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = t.get("/buses/SCH1").await;
    assert_eq!(body["buses"][0]["capacity"], 52);
    assert_eq!(body["buses"][0]["busno"], "KA-01-1234");
    assert_eq!(body["buses"][0]["busdescription"], "AC");

    let (status, _) = t.json("PUT", "/buses/BUS000", json!({"capacity": 1})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = t.delete(&format!("/buses/{busid}")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = t.delete(&format!("/buses/{busid}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn student_lifecycle() {
    let t = spawn_app().await;

    let form = Multipart::default()
        .text("name", "Mia")
        .text("parentid", "mom@home.net")
        .text("date_of_birth", "2016-03-14")
        .text("school_id", "SCH1")
        .text("verified", "false")
        .file("photo", "mia.png", &png(1200, 900));
    let (status, body) = t.multipart("/students/add", form).await;
    assert_eq!(status, StatusCode::OK);
    let student_id = body["student_id"].as_str().unwrap().to_string();
    assert_eq!(student_id.len(), 20);
    let photo_url = body["photo_url"].as_str().unwrap().to_string();
    assert!(photo_url.starts_with("/uploads/students/student_"));

    let (status, _) = t.get(&photo_url).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = t
        .multipart(
            "/students/add",
            Multipart::default().text("name", "NoSchool").text("date_of_birth", "2016-01-01"),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = t.post("/students/all", json!({"school_id": "SCH1"})).await;
    assert_eq!(body["count"], 1);
    let (_, body) = t.post("/students/unverified", json!({"school_id": "SCH1"})).await;
    assert_eq!(body["count"], 0);

    let (status, _) = t
        .post("/students/unverify", json!({"student_id": student_id}))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = t.post("/students/unverified", json!({"school_id": "SCH1"})).await;
    assert_eq!(body["count"], 1);

    let (status, body) = t
        .post(
            "/students/update-bus",
            json!({"student_id": student_id, "morningbus": "BUS1"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated_fields"]["verified"], false);
    assert_eq!(body["updated_fields"]["morningbus"], "BUS1");
    assert!(body["updated_fields"]["eveningbus"].is_null());

    let (_, body) = t.get("/students/mom@home.net").await;
    assert_eq!(body["students"][0]["morningbus"], "BUS1");
    assert_eq!(body["students"][0]["verified"], false);

    let (status, _) = t.get("/students/stranger@home.net").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = t
        .delete(&format!("/students/{student_id}/someone-else@home.net"))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = t
        .delete(&format!("/students/{student_id}/mom@home.net"))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = t
        .post("/students/unverify", json!({"student_id": student_id}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

fn driver_form(email_phone: &str) -> Multipart {
    Multipart::default()
        .text("name", "Ravi")
        .text("date_of_birth", "1985-02-11")
        .text("dl_number", "DL-42")
        .text("email_phone", email_phone)
        .text("school_id", "SCH1")
}

#[tokio::test]
async fn driver_lifecycle() {
    let t = spawn_app().await;

    let (status, body) = t.multipart("/drivers/register", driver_form("ravi@fleet.org")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Driving licence photo is required");

    let (status, body) = t
        .multipart(
            "/drivers/register",
            driver_form("ravi@fleet.org").file("dl_photo", "dl.png", &png(640, 400)),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let driver_id = body["driver_id"].as_str().unwrap().to_string();
    assert!(driver_id.starts_with("driver_"));

    let (status, _) = t
        .multipart(
            "/drivers/register",
            driver_form("ravi@fleet.org").file("dl_photo", "dl.png", &png(640, 400)),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    let stored = std::fs::read_dir(t.dir.path().join("uploads/drivers"))
        .unwrap()
        .count();
    assert_eq!(stored, 1);

    let (status, body) = t
        .post("/drivers/check", json!({"email_phone": "ravi@fleet.org"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["driver"]["is_verified"], false);
    assert!(
        body["driver"]["dl_photo"]
            .as_str()
            .unwrap()
            .starts_with("/uploads/drivers/dl_")
    );

    let (status, body) = t
        .post("/drivers/check", json!({"email_phone": "nobody@fleet.org"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["exists"], false);

    let (_, body) = t.get("/drivers/unverified/SCH1").await;
    assert_eq!(body["drivers"].as_array().unwrap().len(), 1);

    let (status, body) = t
        .post(
            "/drivers/students-morning-bus",
            json!({"driver_id": driver_id}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "No morning bus assigned to this driver");

    let (status, body) = t
        .post(
            "/drivers/update-bus",
            json!({"driver_id": driver_id, "morning_bus": "BUS7"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated_fields"]["is_verified"], true);

    let (_, body) = t.get("/drivers/unverified/SCH1").await;
    assert_eq!(body["drivers"].as_array().unwrap().len(), 0);

    let (status, body) = t
        .post(
            "/drivers/update-location",
            json!({"driver_id": driver_id, "current_location": "12.9,77.6"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated_fields"]["current_location"], "12.9,77.6");
    let driver = t.storage.find_driver(&driver_id).await.unwrap().unwrap();
    assert!(driver.is_on_road);

    t.multipart(
        "/students/add",
        Multipart::default()
            .text("name", "Leo")
            .text("date_of_birth", "2014-09-09")
            .text("school_id", "SCH1"),
    )
    .await;
    let (_, listed) = t.post("/students/all", json!({"school_id": "SCH1"})).await;
    let student_id = listed["students"][0]["student_id"].as_str().unwrap();
    t.post(
        "/students/update-bus",
        json!({"student_id": student_id, "morningbus": "BUS7"}),
    )
    .await;

    let (status, body) = t
        .post(
            "/drivers/students-morning-bus",
            json!({"driver_id": driver_id}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["students"][0]["name"], "Leo");

    let (status, _) = t
        .post(
            "/drivers/students-evening-bus",
            json!({"driver_id": driver_id}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = t
        .post(
            "/drivers/students-evening-bus",
            json!({"driver_id": "driver_0"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = t
        .post(
            "/drivers/update-location",
            json!({"driver_id": "driver_0", "current_location": "0,0"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_json_gets_the_error_shape() {
    let t = spawn_app().await;
    let (status, body) = t
        .send(
            axum::http::Request::builder()
                .method("POST")
                .uri("/school/check")
                .header("content-type", "application/json")
                .body(axum::body::Body::from("{not json"))
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn oversized_bodies_are_rejected_with_413() {
    let t = spawn_app().await;

    let oversized = "a".repeat(TEST_BODY_LIMIT + 1024);
    let (status, body) = t
        .post("/school/check", json!({"email_mobile": oversized}))
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");

    let (status, _) = t
        .multipart(
            "/students/add",
            Multipart::default()
                .text("name", "Big")
                .text("date_of_birth", "2016-01-01")
                .text("school_id", "SCH1")
                .file("photo", "big.bin", &vec![7u8; TEST_BODY_LIMIT + 1024]),
        )
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}
