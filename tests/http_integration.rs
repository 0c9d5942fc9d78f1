// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the HTTP relay protocol using wiremock.

use std::time::Duration;

use relay_garage::config::RelayConfig;
use relay_garage::protocol::{HttpRelay, Relay, RelayEndpoint, TRIGGER_CODE};
use relay_garage::{
    DoorConfig, DoorController, DoorPosition, Error, ParseError, ProtocolError, SwitchSensor,
    TargetPosition,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn host(mock_server: &MockServer) -> String {
    mock_server.uri().replace("http://", "")
}

fn relay(mock_server: &MockServer, channel: &str) -> HttpRelay {
    HttpRelay::new(RelayEndpoint::new(host(mock_server), "sec", channel)).unwrap()
}

async fn mount_status(mock_server: &MockServer, channel: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path("/sec/"))
        .and(query_param("pt", channel))
        .and(query_param("cmd", "get"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(mock_server)
        .await;
}

// ============================================================================
// HttpRelay Tests
// ============================================================================

mod http_relay {
    use super::*;

    #[tokio::test]
    async fn send_trigger_command() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/sec/"))
            .and(query_param("cmd", "4:1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Done"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let response = relay(&mock_server, "4")
            .send_command(TRIGGER_CODE)
            .await
            .unwrap();
        assert_eq!(response.body(), "Done");
    }

    #[tokio::test]
    async fn query_state_on() {
        let mock_server = MockServer::start().await;
        mount_status(&mock_server, "5", "ON/1").await;

        let relay = relay(&mock_server, "5");
        assert!(relay.is_power_on().await.unwrap());
    }

    #[tokio::test]
    async fn query_state_off_with_suffix() {
        let mock_server = MockServer::start().await;
        mount_status(&mock_server, "5", "OFF/extra").await;

        let relay = relay(&mock_server, "5");
        assert!(!relay.is_power_on().await.unwrap());
    }

    #[tokio::test]
    async fn unrecognized_state_is_parse_error() {
        let mock_server = MockServer::start().await;
        mount_status(&mock_server, "5", "FOO").await;

        let result = relay(&mock_server, "5").is_power_on().await;
        assert!(matches!(
            result,
            Err(Error::Parse(ParseError::UnrecognizedState(body))) if body == "FOO"
        ));
    }

    #[tokio::test]
    async fn server_error_is_connection_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let result = relay(&mock_server, "5").query_state().await;
        match result {
            Err(ProtocolError::ConnectionFailed(msg)) => assert!(msg.contains("500")),
            other => panic!("expected connection failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn secret_is_url_encoded() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/a%20b/"))
            .and(query_param("cmd", "4:1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let relay = HttpRelay::new(RelayEndpoint::new(host(&mock_server), "a b", "4")).unwrap();
        relay.send_command(TRIGGER_CODE).await.unwrap();
    }
}

// ============================================================================
// SwitchSensor Tests
// ============================================================================

mod switch_sensor {
    use super::*;

    #[tokio::test]
    async fn reads_active_switch() {
        let mock_server = MockServer::start().await;
        mount_status(&mock_server, "6", "ON").await;

        let sensor = SwitchSensor::new(relay(&mock_server, "6"));
        assert_eq!(sensor.is_active().await, Some(true));
    }

    #[tokio::test]
    async fn failed_reading_is_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let sensor = SwitchSensor::new(relay(&mock_server, "6"));
        assert_eq!(sensor.is_active().await, None);
    }

    #[tokio::test]
    async fn timeout_is_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("ON")
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let endpoint = RelayEndpoint::new(host(&mock_server), "sec", "6")
            .with_timeout(Duration::from_millis(100));
        let sensor = SwitchSensor::new(HttpRelay::new(endpoint).unwrap());
        assert_eq!(sensor.is_active().await, None);
    }
}

// ============================================================================
// DoorController Tests
// ============================================================================

mod door_controller {
    use super::*;

    fn config(mock_server: &MockServer, channel: &str) -> RelayConfig {
        RelayConfig::new(host(mock_server), "sec", channel)
    }

    #[tokio::test]
    async fn switch_door_opens() {
        let mock_server = MockServer::start().await;
        mount_status(&mock_server, "5", "OFF").await;
        mount_status(&mock_server, "6", "ON").await;

        let door_config = DoorConfig::new(config(&mock_server, "4"))
            .with_switches(config(&mock_server, "5"), config(&mock_server, "6"))
            .with_delay_after_command(Duration::from_millis(200))
            .with_initial_position(TargetPosition::Open);
        let door = DoorController::from_config(&door_config).unwrap();

        let change = door.refresh().await.unwrap();
        assert_eq!(change.current, DoorPosition::Closed);

        Mock::given(method("GET"))
            .and(path("/sec/"))
            .and(query_param("cmd", "4:1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        assert!(door.set_target(DoorPosition::Open).await);
        let change = door.refresh().await.unwrap();
        assert_eq!(change.current, DoorPosition::Opening);

        // Door reaches the top once the debounce window has passed.
        mock_server.reset().await;
        mount_status(&mock_server, "5", "ON").await;
        mount_status(&mock_server, "6", "OFF").await;
        tokio::time::sleep(Duration::from_millis(250)).await;

        let change = door.refresh().await.unwrap();
        assert_eq!(change.current, DoorPosition::Open);
        assert_eq!(change.target, Some(TargetPosition::Open));
    }

    #[tokio::test]
    async fn timer_door_closes() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("cmd", "4:1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let door_config = DoorConfig::new(config(&mock_server, "4"))
            .with_travel_duration(Duration::from_millis(200));
        let door = DoorController::from_config(&door_config).unwrap();

        assert!(door.set_target(DoorPosition::Closed).await);
        assert_eq!(
            door.refresh().await.map(|c| c.current),
            Some(DoorPosition::Closing)
        );

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(
            door.refresh().await.map(|c| c.current),
            Some(DoorPosition::Closed)
        );
    }

    #[tokio::test]
    async fn unreachable_trigger_does_not_fail_command() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let door_config = DoorConfig::new(config(&mock_server, "4"))
            .with_travel_duration(Duration::from_secs(10));
        let door = DoorController::from_config(&door_config).unwrap();

        assert!(door.set_target(DoorPosition::Closed).await);
        assert_eq!(door.target_position(), TargetPosition::Closed);
    }
}
