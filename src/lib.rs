// SPDX-License-Identifier: MIT

pub mod forms;
