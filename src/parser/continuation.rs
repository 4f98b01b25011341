// SPDX-License-Identifier: Apache-2.0

use crate::parser::escape::unescape;

/// Unescape a record body and fold its continuation lines into one message.
///
/// The first line is the message proper. Each following line (dictionary
/// entries such as ` SUBSYSTEM=acpi`) is appended after a `\n`, keeping its
/// leading space. Empty lines are joined like any other. Escapes never span
/// lines, so every line is decoded on its own.
pub(crate) fn aggregate(body: &[u8]) -> Vec<u8> {
    // /dev/kmsg terminates each record with a newline
    let body = body.strip_suffix(b"\n").unwrap_or(body);

    let mut lines = body.split(|&b| b == b'\n');
    let mut message = lines.next().map(unescape).unwrap_or_default();

    for line in lines {
        message.push(b'\n');
        message.extend_from_slice(&unescape(line));
    }

    message
}
