//! E2E测试模块
