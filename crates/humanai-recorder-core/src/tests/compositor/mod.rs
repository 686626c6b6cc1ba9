mod frame_compositor;
