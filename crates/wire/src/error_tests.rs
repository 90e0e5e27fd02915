// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    malformed_json = { ProtocolError::MalformedJson("x".into()), 400 },
    unknown_resource = { ProtocolError::UnknownResource("/nope".into()), 404 },
    invalid_field = { ProtocolError::InvalidField("instance_match".into()), 422 },
    invalid_criteria = { ProtocolError::InvalidCriteria("job_ids".into()), 422 },
    handler_error = { ProtocolError::HandlerError("boom".into()), 422 },
    unexpected = { ProtocolError::Unexpected, 500 },
)]
fn protocol_error_status_codes(error: ProtocolError, expected: u16) {
    assert_eq!(error.code().as_u16(), expected);
}
