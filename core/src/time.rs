// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Time related utils.

use chrono::SecondsFormat;
use chrono::Utc;

use crate::Error;

/// The default timestamp type used across this crate.
pub type DateTime = chrono::DateTime<Utc>;

/// Returns the current UTC time.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format a timestamp as an HTTP `Date` header value.
///
/// For example: `Mon, 15 Aug 2022 16:50:12 GMT`.
pub fn format_http_date(t: DateTime) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Format a timestamp the way the service writes them in XML bodies.
///
/// For example: `2009-11-19T19:37:58Z`.
pub fn format_iso8601(t: DateTime) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a timestamp from an XML body.
///
/// Accepts both `2009-11-19T19:37:58Z` and the fractional-second variant
/// `2009-11-19T19:37:58.421Z`.
pub fn parse_iso8601(s: &str) -> crate::Result<DateTime> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::protocol(format!("invalid timestamp: {s}")).with_source(e))
}
